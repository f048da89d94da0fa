fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The gateway only ever calls the auth service
    tonic_build::configure()
        .build_server(false)
        .build_client(true)
        .compile(&["../proto/auth.proto"], &["../proto"])?;

    Ok(())
}
