use crc32fast::Hasher;

/// Generate a document seed from a project path using CRC32
pub fn get_document_seed(path: &str) -> String {
    let mut buff = String::from(path);
    if !path.starts_with("file://") {
        buff = format!("file://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for nodes and edges within a document
///
/// Every created node gets a fresh id; pasted subtrees are remapped through
/// the same generator so ids never collide within one document.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Document seed (CRC32 of project path)
    count: u64,   // Sequential counter
}

impl IdGenerator {
    pub fn new(path: &str) -> Self {
        Self {
            seed: get_document_seed(path),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Advance the counter past ids already present in a loaded document
    pub fn advance_past(&mut self, existing: impl Iterator<Item = u64>) {
        for n in existing {
            self.count = self.count.max(n);
        }
    }

    /// Get document seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}
