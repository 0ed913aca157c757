use rocket::{
    http::{ContentType, Status},
    outcome::Outcome,
    request::{self, FromRequest},
    response::{self, Responder},
    Request, Response,
};

use crate::{config::ResolveIp, models::ScannerContext, Error, Gatepass};

/// HTTP response builder for Error enum
impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = match self {
            Error::IncorrectData { .. } => Status::BadRequest,
            Error::DatabaseError { .. } => Status::InternalServerError,
            Error::InternalError => Status::InternalServerError,
            Error::OperationFailed => Status::InternalServerError,
            Error::MissingHeaders => Status::BadRequest,
            Error::UnknownTicket => Status::NotFound,
            Error::UnknownEvent => Status::NotFound,
            Error::Unauthorized => Status::Unauthorized,
            Error::AlreadyUsed => Status::Conflict,
        };

        // Serialize the error data structure into JSON.
        let string = json!(self).to_string();

        // Build and send the request.
        Response::build()
            .sized_body(string.len(), std::io::Cursor::new(string))
            .header(ContentType::new("application", "json"))
            .status(status)
            .ok()
    }
}

fn resolve_ip(request: &'_ Request<'_>, config: &ResolveIp) -> String {
    match config {
        ResolveIp::Remote => request
            .remote()
            .map(|x| x.ip().to_string())
            .unwrap_or_default(),
        ResolveIp::Cloudflare => request
            .headers()
            .get_one("CF-Connecting-IP")
            .map(|x| x.to_string())
            .unwrap_or_else(|| resolve_ip(request, &ResolveIp::Remote)),
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ScannerContext {
    type Error = Error;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let header_scanner_id = request
            .headers()
            .get("x-scanner-id")
            .next()
            .map(|x| x.to_string());

        match (request.rocket().state::<Gatepass>(), header_scanner_id) {
            (Some(gatepass), Some(scanner_id)) => {
                let ip = resolve_ip(request, &gatepass.config.resolve_ip);

                Outcome::Success(ScannerContext {
                    scanner_id,
                    location: None,
                    ip_address: if ip.is_empty() { None } else { Some(ip) },
                })
            }
            (_, _) => Outcome::Error((Status::BadRequest, Error::MissingHeaders)),
        }
    }
}
