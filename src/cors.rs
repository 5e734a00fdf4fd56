use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::options;
use rocket::{Request, Response};

/// Adds permissive CORS headers to every response, errors included, so the
/// browser client can call the API from another origin.
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET,POST,PUT,DELETE,OPTIONS",
        ));
        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Content-Type,Authorization",
        ));
    }
}

#[options("/<_..>")]
pub fn preflight() -> Status {
    Status::NoContent
}
