/// Collection path for the price list
pub const SERVICES_PATH: &str = "/api/services";

/// Port the server listens on when neither config nor `PORT` says otherwise
pub const DEFAULT_PORT: u16 = 7070;

/// Base URL the client talks to by default
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:7070/api/services";

/// Body sent with a simulated transient failure (HTTP 500)
pub const SIMULATED_FAILURE_BODY: &str = "Something went wrong";
