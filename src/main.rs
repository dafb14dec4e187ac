use aws_config::BehaviorVersion;
use aws_lambda_events::event::sns::SnsEvent;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use stdf_notifier::converter::{SnsPublisher, TracingTelemetry};
use stdf_notifier::slack::config::SecretsManagerWebhookSource;
use stdf_notifier::slack::webhook::WebhookClient;
use stdf_notifier::{converter, slack, AwsClients, Stage};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    stdf_notifier::set_up_logging();

    info!(
        "Initializing {} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let stage = Stage::load_from_env()?;
    info!("Running {} stage", stage);

    let aws_config = aws_config::load_defaults(BehaviorVersion::v2023_11_09()).await;
    let clients = AwsClients::new(&aws_config);

    match stage {
        Stage::Converter => {
            let config = converter::config::Config::load_from_env()?;
            let publisher = SnsPublisher::new(clients.sns, config);
            let telemetry = TracingTelemetry;

            run(service_fn(|request: LambdaEvent<SnsEvent>| {
                converter::handler(&publisher, &telemetry, request)
            }))
            .await
        }
        Stage::Slack => {
            let config = slack::config::Config::load_from_env()?;
            let webhook_source = SecretsManagerWebhookSource::new(clients.secretsmanager, config);
            let delivery = WebhookClient::new();

            run(service_fn(|request: LambdaEvent<SnsEvent>| {
                slack::handler(&webhook_source, &delivery, request)
            }))
            .await
        }
    }
}
