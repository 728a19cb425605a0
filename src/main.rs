// Thin delegating binary.
//
// The server assembly lives in the library crate.
#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    mentorship_portal_server::server::run().await
}
