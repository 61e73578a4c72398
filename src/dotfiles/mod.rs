//! Dotfiles domain.
//!
//! Sources live under `<config_dir>/dotfiles/`; `zshrc` deploys to
//! `~/.zshrc` and `config/nvim/init.lua` to `~/.config/nvim/init.lua`.
//! Sources ending in `.tmpl` are rendered with config vars first.

mod domain;
pub mod scanner;
pub mod transport;

pub use domain::DotfileDomain;
pub use scanner::{DotfileDecl, IgnoreFilter};
