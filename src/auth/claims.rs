use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload. Decoding into this fixed layout is part of validation: a
/// token whose claims don't fit is rejected like a bad signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
}
