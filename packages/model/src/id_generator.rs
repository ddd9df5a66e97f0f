use crc32fast::Hasher;

/// Derive a stable document seed from a page identifier using CRC32.
pub fn get_document_seed(page_id: &str) -> String {
    let mut buff = String::from(page_id);
    if !page_id.starts_with("page://") {
        buff = format!("page://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes within one editing session.
///
/// Ids are `{seed}-{n}`; the seed ties them to the page so ids minted in
/// different sessions on different pages never collide.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(page_id: &str) -> Self {
        Self {
            seed: get_document_seed(page_id),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate the next sequential id.
    pub fn next_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_stable_per_page() {
        let a = get_document_seed("7f1c9f3e");
        let b = get_document_seed("7f1c9f3e");
        assert_eq!(a, b);

        let c = get_document_seed("other-page");
        assert_ne!(a, c);
    }

    #[test]
    fn test_sequential_ids_share_seed() {
        let mut ids = IdGenerator::new("7f1c9f3e");

        let first = ids.next_id();
        let second = ids.next_id();

        assert!(first.ends_with("-1"));
        assert!(second.ends_with("-2"));
        assert_ne!(first, second);
        assert!(first.starts_with(ids.seed()));
    }
}
