//! corlift binary entry point

fn main() -> anyhow::Result<()> {
    corlift_cli::run()
}
