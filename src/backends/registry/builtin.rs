//! Built-in manager definitions, shipped as KDL in the same syntax users write.

pub(super) const BUILTIN_MANAGERS: &str = r##"
manager "brew" {
    binary "brew"
    description "Homebrew (macOS/Linux package manager)"
    install-hint "Visit https://brew.sh for installation instructions"
    help-url "https://brew.sh"
    list "brew list -1"
    install "brew install {package}" {
        idempotent "already installed"
    }
    uninstall "brew uninstall {package}"
    upgrade "brew upgrade {package}" {
        idempotent "already up-to-date" "already installed"
    }
    upgrade-all "brew upgrade" {
        idempotent "already up-to-date"
    }
    search "brew search {query}" {
        skip "^==>"
    }
    info "brew info {package}"
}

manager "cargo" {
    binary "cargo"
    description "Cargo (Rust package manager)"
    install-hint "Install Rust from https://rustup.rs/"
    help-url "https://www.rust-lang.org/tools/install"
    list "cargo install --list" {
        skip "^[ ]"
    }
    install "cargo install {package}" {
        idempotent "already exists" "already installed"
    }
    uninstall "cargo uninstall {package}"
    upgrade "cargo install --force {package}" {
        idempotent "already up-to-date" "up to date"
    }
    search "cargo search {query}" {
        skip "^[.][.][.]" "^note:"
    }
    name-transform pattern="^([^ ]+) (v[^ ]*:|= .*)$" replacement="$1"
    metadata {
        version pattern="^[^ ]+ [^0-9]*([0-9][-.+0-9A-Za-z]*)" source="raw"
        description pattern="# (.*)$" source="raw"
    }
}

manager "conda" {
    binary "conda"
    description "conda (Python/conda package manager)"
    install-hint "Install conda via Anaconda or Miniconda distributions"
    help-url "https://docs.conda.io/"
    list "conda list --json" {
        parse "json-array"
    }
    install "conda install -y {package}" {
        idempotent "already installed" "all requested packages already installed"
    }
    uninstall "conda remove -y {package}"
    upgrade "conda update -y {package}" {
        idempotent "already up-to-date" "up to date"
    }
    upgrade-all "conda update -y --all" {
        idempotent "already up-to-date" "up to date"
    }
    search "conda search --json {query}" {
        parse "json-map"
    }
}

manager "gem" {
    binary "gem"
    description "gem (Ruby package manager)"
    install-hint "Install Ruby from https://ruby-lang.org/ or use brew install ruby"
    help-url "https://ruby-lang.org/"
    list "gem list --local --no-versions" {
        skip "^[*]"
    }
    install "gem install {package} --user-install" {
        idempotent "already installed"
    }
    uninstall "gem uninstall {package} -x"
    upgrade "gem update {package}" {
        idempotent "already up-to-date" "up to date" "nothing to update"
    }
    upgrade-all "gem update" {
        idempotent "already up-to-date" "up to date" "nothing to update"
    }
    search "gem search {query}" {
        skip "^[*]"
    }
    info "gem specification {package}"
    name-transform pattern="^([^ ]+) [(].*[)]$" replacement="$1"
    metadata {
        version pattern="^[^ ]+ [(]([^),]+)" source="raw"
    }
}

manager "npm" {
    binary "npm"
    description "npm (Node.js package manager)"
    install-hint "Install Node.js from https://nodejs.org/ or use brew install node"
    help-url "https://nodejs.org/"
    list "npm list -g --depth=0 --json" {
        parse "json-map"
        json-path "dependencies"
    }
    install "npm install -g {package}" {
        idempotent "already installed"
    }
    uninstall "npm uninstall -g {package}"
    upgrade "npm update -g {package}" {
        idempotent "already up-to-date" "up to date"
    }
    upgrade-all "npm update -g" {
        idempotent "already up-to-date" "up to date"
    }
    search "npm search --json {query}" {
        parse "json-array"
    }
    info "npm view {package}"
    upgrade-target "full-name-preferred"
    metadata {
        scope pattern="^(@[^/]+)/"
        full_name source="raw"
    }
}

manager "pipx" {
    binary "pipx"
    description "pipx (Python application installer)"
    install-hint "Install pipx with brew install pipx or python3 -m pip install --user pipx"
    help-url "https://pipx.pypa.io/"
    list "pipx list --short"
    install "pipx install {package}" {
        idempotent "already installed" "already seems to be installed"
    }
    uninstall "pipx uninstall {package}" {
        idempotent "not installed"
    }
    upgrade "pipx upgrade {package}" {
        idempotent "already up-to-date" "up to date" "already at latest version"
    }
    upgrade-all "pipx upgrade-all"
    name-transform pattern="^([^ ]+) .*$" replacement="$1"
    metadata {
        version pattern="^[^ ]+ ([^ ]+)" source="raw"
    }
}

manager "pnpm" {
    binary "pnpm"
    description "pnpm (Node.js package manager)"
    install-hint "Install pnpm from https://pnpm.io/ or use brew install pnpm"
    help-url "https://pnpm.io/"
    list "pnpm list -g --depth=0 --json" {
        parse "json-map"
        json-path "0.dependencies"
    }
    install "pnpm add -g {package}" {
        idempotent "already installed"
    }
    uninstall "pnpm remove -g {package}"
    upgrade "pnpm update -g {package}" {
        idempotent "already up-to-date" "up to date"
    }
    upgrade-all "pnpm update -g" {
        idempotent "already up-to-date" "up to date"
    }
    upgrade-target "full-name-preferred"
    metadata {
        scope pattern="^(@[^/]+)/"
        full_name source="raw"
    }
}

manager "uv" {
    binary "uv"
    description "uv (Python package manager)"
    install-hint "Install uv from https://docs.astral.sh/uv/ or use brew install uv"
    help-url "https://docs.astral.sh/uv/"
    list "uv tool list" {
        skip "^-" "^No tools installed"
    }
    install "uv tool install {package}" {
        idempotent "already installed"
    }
    uninstall "uv tool uninstall {package}" {
        idempotent "is not installed"
    }
    upgrade "uv tool upgrade {package}" {
        idempotent "already up-to-date" "up to date" "nothing to upgrade"
    }
    upgrade-all "uv tool upgrade --all" {
        idempotent "already up-to-date" "up to date" "nothing to upgrade"
    }
    name-transform pattern="^([^ ]+) v.*$" replacement="$1"
    metadata {
        version pattern="^[^ ]+ v([^ ]+)" source="raw"
    }
}
"##;
