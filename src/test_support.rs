//! Fixtures shared by unit tests.

use crate::domain::{CreatePostDto, CreateUserDto, Post, RepositoryProvider, User};

pub async fn seed_user(repos: &dyn RepositoryProvider, name: &str) -> User {
    repos
        .users()
        .create(CreateUserDto {
            username: name.into(),
            email: format!("{name}@example.com"),
            password_hash: "hash".into(),
            bio: None,
        })
        .await
        .unwrap()
}

pub async fn seed_post(repos: &dyn RepositoryProvider, author: &User) -> Post {
    repos
        .posts()
        .create(CreatePostDto {
            title: "title".into(),
            content: "content".into(),
            author_id: author.id.clone(),
        })
        .await
        .unwrap()
}
