use aws_config::SdkConfig;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use aws_sdk_sns::Client as SnsClient;

/// A type used to hold the AWS clients required to interact with AWS services
/// used by the lambda function.
#[derive(Clone)]
pub struct AwsClients {
    pub sns: SnsClient,
    pub secretsmanager: SecretsManagerClient,
}

impl AwsClients {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        AwsClients {
            sns: SnsClient::new(sdk_config),
            secretsmanager: SecretsManagerClient::new(sdk_config),
        }
    }
}
