fn main() -> anyhow::Result<()> {
    tumblecube::run()
}
