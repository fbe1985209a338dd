fn main() -> anyhow::Result<()> {
    rime::cli::run()
}
