fn main() -> anyhow::Result<()> {
    handpaint::logging::init();
    handpaint::cli::run()
}
