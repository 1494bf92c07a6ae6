pub(crate) mod cors;
pub(crate) mod security_headers;
pub(crate) mod token_gate;
