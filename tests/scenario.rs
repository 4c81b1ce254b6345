use color_eyre::Result;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use user_directory::user::User;

mod common;
use common::{data, Client};

#[tokio::test]
async fn register_search_connect_list() -> Result<()> {
    let client = Client::start().await;

    let admin = client.registered("user0", true).await?;

    let (status, envelope) = client.list(&admin).await?;
    assert_eq!(status, StatusCode::OK);
    let users: Vec<User> = data(envelope)?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "user0");
    assert_eq!(users[0].id.to_string(), admin);
    assert!(users[0].is_admin);

    let user1 = client.registered("user1", false).await?;
    let _user2 = client.registered("user2", false).await?;
    let user3 = client.registered("user3", false).await?;

    let (status, envelope) = client.register("user3", false).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(envelope.message, "Duplicate name. Please choose another name");

    let (status, envelope) = client.list(&admin).await?;
    assert_eq!(status, StatusCode::OK);
    let users: Vec<User> = data(envelope)?;
    assert_eq!(users.len(), 4);
    assert_eq!(users.iter().filter(|user| user.is_admin).count(), 1);
    assert_eq!(users.iter().filter(|user| !user.is_admin).count(), 3);

    let (status, envelope) = client.search(&user1, Some("user")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        envelope.message,
        "Successfully retrieved list of users matching: user"
    );
    let names: Vec<String> = data(envelope)?;
    assert_eq!(names, vec!["user0", "user2", "user3"]);

    let (status, envelope) = client.connect(&user1, "user3").await?;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = data(envelope)?;
    assert_eq!(names, vec!["user1", "user3"]);

    let (_, envelope) = client.list(&admin).await?;
    let users: Vec<User> = data(envelope)?;
    let by_name = |name: &str| users.iter().find(|user| user.name == name).unwrap();

    assert_eq!(by_name("user1").connections, vec![by_name("user3").id]);
    assert_eq!(by_name("user3").connections, vec![by_name("user1").id]);
    assert_eq!(user3, by_name("user3").id.to_string());
    assert!(by_name("user0").connections.is_empty());
    assert!(by_name("user2").connections.is_empty());

    Ok(())
}

#[tokio::test]
async fn routes_are_also_under_api() -> Result<()> {
    let client = Client::start().await;
    let admin = client.registered("admin", true).await?;

    let response = reqwest::get(client.url(&format!("/api/users/{admin}"))).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let (_, envelope) = common::read(response).await?;
    let users: Vec<User> = data(envelope)?;
    assert_eq!(users.len(), 1);

    Ok(())
}

#[tokio::test]
async fn version() -> Result<()> {
    let client = Client::start().await;

    let body = reqwest::get(client.url("/version")).await?.text().await?;

    assert!(body.starts_with("User Directory v"));

    Ok(())
}
