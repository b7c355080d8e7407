use sha2::{Digest, Sha256};

pub(crate) fn gender_key(name: &str, context: &str) -> String {
    let mut h = Sha256::new();
    h.update(name.as_bytes());
    h.update(b"\n");
    h.update(context.as_bytes());
    format!("{:x}", h.finalize())
}

pub(crate) fn topic_key(dialogue: &str) -> String {
    let mut h = Sha256::new();
    h.update(dialogue.as_bytes());
    format!("{:x}", h.finalize())
}
