fn main() {
    homedecl::run_cli();
}
