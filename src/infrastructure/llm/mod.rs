mod bedrock_agent_client;
mod bedrock_runtime_client;

pub use bedrock_agent_client::BedrockAgentClient;
pub use bedrock_runtime_client::BedrockRuntimeClient;
