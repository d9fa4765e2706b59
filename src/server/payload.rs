use serde_json::Value;

type SignatureLocator = fn(&Value) -> Option<&str>;

/// Tried in order; the first locator that finds a signature wins.
const SIGNATURE_LOCATORS: [SignatureLocator; 3] = [from_batch, from_event, from_direct];

/// Find the transaction signature in a webhook payload, whichever shape it was
/// delivered in.
pub fn webhook_signature(payload: &Value) -> Option<&str> {
    SIGNATURE_LOCATORS
        .iter()
        .find_map(|locate| locate(payload))
}

/// `[{ "signature": ... }, ...]`
fn from_batch(payload: &Value) -> Option<&str> {
    payload.as_array()?.first().and_then(signature_field)
}

/// `{ "event": { "transaction": [{ "signature": ... }] } }`
fn from_event(payload: &Value) -> Option<&str> {
    payload
        .get("event")?
        .get("transaction")?
        .as_array()?
        .first()
        .and_then(signature_field)
}

/// `{ "signature": ... }`
fn from_direct(payload: &Value) -> Option<&str> {
    signature_field(payload)
}

fn signature_field(value: &Value) -> Option<&str> {
    value
        .get("signature")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
