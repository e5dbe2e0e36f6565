use aws_config::SdkConfig;
use aws_sdk_dynamodb::{config::Builder as DbConfigBuilder, Client as DbClient};
use aws_sdk_dynamodbstreams::{config::Builder as StreamConfigBuilder, Client as StreamClient};

/// The DynamoDB and DynamoDB Streams clients the adapters share.
#[derive(Debug, Clone)]
pub struct DynamodbClients {
    db_client: DbClient,
    stream_client: StreamClient,
}

impl DynamodbClients {
    pub fn builder(config: &SdkConfig) -> DynamodbClientsBuilder {
        DynamodbClientsBuilder::new(config)
    }

    pub fn db(&self) -> DbClient {
        self.db_client.clone()
    }

    pub fn streams(&self) -> StreamClient {
        self.stream_client.clone()
    }
}

#[derive(Debug)]
pub struct DynamodbClientsBuilder {
    db_builder: DbConfigBuilder,
    stream_builder: StreamConfigBuilder,
}

impl DynamodbClientsBuilder {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            db_builder: DbConfigBuilder::from(config),
            stream_builder: StreamConfigBuilder::from(config),
        }
    }

    /// Points both clients at another endpoint, e.g. DynamoDB Local.
    pub fn endpoint_url(self, url: Option<String>) -> Self {
        match url {
            Some(url) => Self {
                db_builder: self.db_builder.endpoint_url(&url),
                stream_builder: self.stream_builder.endpoint_url(&url),
            },
            None => self,
        }
    }

    pub fn build(self) -> DynamodbClients {
        DynamodbClients {
            db_client: DbClient::from_conf(self.db_builder.build()),
            stream_client: StreamClient::from_conf(self.stream_builder.build()),
        }
    }
}
