use std::net::{IpAddr, Ipv4Addr};

use color_eyre::Result;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use user_directory::{config::Config, user::User};

mod common;
use common::{data, start_server_with_config, Client};

#[tokio::test]
async fn users_outlive_the_server() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = Config {
        bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        store_path: Some(dir.path().join("users.ron")),
        ..Default::default()
    };

    let client = Client::new(start_server_with_config(config.clone()).await);
    let admin = client.registered("admin", true).await?;
    let friend = client.registered("friend", false).await?;
    client.connect(&admin, "friend").await?;

    // A second server on the same snapshot sees the same users.
    let client = Client::new(start_server_with_config(config).await);

    let (status, envelope) = client.list(&admin).await?;
    assert_eq!(status, StatusCode::OK);

    let users: Vec<User> = data(envelope)?;
    let names = users.iter().map(|user| user.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["admin", "friend"]);
    assert_eq!(users[0].connections[0].to_string(), friend);
    assert_eq!(users[1].connections[0].to_string(), admin);

    let (status, _) = client.register("friend", false).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}
