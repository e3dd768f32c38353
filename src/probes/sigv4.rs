//! Minimal AWS Signature Version 4 signer.
//!
//! Covers exactly what the AWS probes need: GET requests with an empty
//! payload and a pre-canonicalized query string. Not a general-purpose
//! signer.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const REGION: &str = "us-east-1";

/// Sign an empty-payload GET and return the headers to attach:
/// `x-amz-date`, `x-amz-content-sha256`, and `authorization`.
///
/// `query` must already be in canonical form (sorted, URI-encoded);
/// the fixed probe queries satisfy this by construction.
pub fn sign_get(
    host: &str,
    path: &str,
    query: &str,
    service: &str,
    access_key: &str,
    secret_key: &str,
    at: DateTime<Utc>,
) -> Vec<(String, String)> {
    let amz_date = at.format("%Y%m%dT%H%M%SZ").to_string();
    let date = at.format("%Y%m%d").to_string();
    let payload_hash = hex::encode(Sha256::digest(b""));

    let canonical_headers = format!(
        "host:{host}\nx-amz-content-sha256:{payload_hash}\nx-amz-date:{amz_date}\n"
    );
    let signed_headers = "host;x-amz-content-sha256;x-amz-date";
    let canonical_request =
        format!("GET\n{path}\n{query}\n{canonical_headers}\n{signed_headers}\n{payload_hash}");

    let scope = format!("{date}/{REGION}/{service}/aws4_request");
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, REGION.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    let k_signing = hmac_sha256(&k_service, b"aws4_request");
    let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes()));

    let authorization = format!(
        "{ALGORITHM} Credential={access_key}/{scope}, SignedHeaders={signed_headers}, Signature={signature}"
    );

    vec![
        ("x-amz-date".to_string(), amz_date),
        ("x-amz-content-sha256".to_string(), payload_hash),
        ("authorization".to_string(), authorization),
    ]
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
    }

    #[test]
    fn test_signing_is_deterministic() {
        let a = sign_get("s3.amazonaws.com", "/", "", "s3", "AKID", "SECRET", fixed_time());
        let b = sign_get("s3.amazonaws.com", "/", "", "s3", "AKID", "SECRET", fixed_time());
        assert_eq!(a, b);
    }

    #[test]
    fn test_authorization_header_shape() {
        let headers = sign_get(
            "ec2.amazonaws.com",
            "/",
            "Action=DescribeRegions&Version=2016-11-15",
            "ec2",
            "AKIDEXAMPLE",
            "SECRET",
            fixed_time(),
        );
        let auth = &headers
            .iter()
            .find(|(name, _)| name == "authorization")
            .expect("authorization header present")
            .1;

        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/ec2/aws4_request"));
        assert!(auth.contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date"));

        let signature = auth.split("Signature=").nth(1).expect("signature present");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let a = sign_get("s3.amazonaws.com", "/", "", "s3", "AKID", "SECRET-A", fixed_time());
        let b = sign_get("s3.amazonaws.com", "/", "", "s3", "AKID", "SECRET-B", fixed_time());
        assert_ne!(a, b);
    }

    #[test]
    fn test_amz_date_format() {
        let headers = sign_get("s3.amazonaws.com", "/", "", "s3", "AKID", "SECRET", fixed_time());
        let amz_date = &headers
            .iter()
            .find(|(name, _)| name == "x-amz-date")
            .expect("x-amz-date header present")
            .1;
        assert_eq!(amz_date, "20150830T123600Z");
    }
}
