//! Email finder and domain trace requests.

// #[request("email-finder/submit")]
#[derive(Debug, Clone)]
pub struct FindEmailsReq {
    pub first_name: String,
    pub last_name: String,
    pub domain: String,
}

impl FindEmailsReq {
    pub const PATH: &'static str = "email-finder/submit";
}

// #[request("domain-trace/submit")]
#[derive(Debug, Clone)]
pub struct TraceDomainReq {
    pub domain: String,
}

impl TraceDomainReq {
    pub const PATH: &'static str = "domain-trace/submit";
}
