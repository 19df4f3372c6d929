/// Result of one logical shard's merge-and-put.
#[derive(Debug, Clone, PartialEq)]
pub struct ShardStat {
    pub store_id: String,
    pub version: String,
    pub total: usize,
    pub new_count: usize,
}
