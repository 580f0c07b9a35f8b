fn main() -> Result<(), Box<dyn std::error::Error>> {
    nmapai::cli::main()
}
