fn main() -> anyhow::Result<()> {
    query_history::cli::run()
}
