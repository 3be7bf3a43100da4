fn main() {
    hyphen_report::cli::run();
}
