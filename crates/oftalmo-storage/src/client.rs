use aws_sdk_s3::Client;

/// Build an S3 client for `region`, taking credentials from the default
/// provider chain.
pub async fn build_client_with_region(region: &str) -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&config)
}
