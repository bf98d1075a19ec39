//! 两个记忆工具共用的描述文案与默认值

pub const SEARCH_MEMORIES: &str = "searchMemories";
pub const ADD_MEMORY: &str = "addMemory";

pub const SEARCH_MEMORIES_DESCRIPTION: &str = "Search (recall) memories/details/information about the user or other facts or entities. \
     Run when explicitly asked or when context about user's past choices would be helpful.";

pub const ADD_MEMORY_DESCRIPTION: &str = "Add (remember) memories/details/information about the user or other facts or entities. \
     Run when explicitly asked or when the user mentions any information generalizable beyond the context of the current conversation.";

pub const INFORMATION_TO_GET_DESCRIPTION: &str = "Terms to search for in the user's memories";
pub const INCLUDE_FULL_DOCS_DESCRIPTION: &str = "Whether to include the full document content in the response. \
     Defaults to true for better AI context.";
pub const LIMIT_DESCRIPTION: &str = "Maximum number of results to return";
pub const MEMORY_DESCRIPTION: &str = "The text content of the memory to add. \
     This should be a single sentence or a short paragraph.";

pub const DEFAULT_INCLUDE_FULL_DOCS: bool = true;
pub const DEFAULT_LIMIT: u32 = 10;
/// 服务端切分文档片段时的相关度阈值
pub const CHUNK_THRESHOLD: f64 = 0.6;
