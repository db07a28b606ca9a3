fn main() {
    #[cfg(feature = "cli")]
    baseenc::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("baseenc: this build has no command-line front end (enable the `cli` feature)");
        std::process::exit(1);
    }
}
