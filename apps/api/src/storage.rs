#![allow(dead_code)]

//! User-credential repository. This model is disconnected from the
//! career-matching flow: nothing in the recommendation path reads or writes
//! users. The store is injected at process start — `PgStorage` when
//! `DATABASE_URL` is set, `MemStorage` otherwise.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertUser {
    pub username: String,
    pub password: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: i32) -> Result<Option<User>, AppError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn create_user(&self, user: InsertUser) -> Result<User, AppError>;
}

/// In-memory store: keyed map plus an id counter.
#[derive(Debug, Default)]
pub struct MemStorage {
    inner: Mutex<MemInner>,
}

#[derive(Debug)]
struct MemInner {
    users: HashMap<i32, User>,
    next_id: i32,
}

impl Default for MemInner {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
            next_id: 1,
        }
    }
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemStorage {
    async fn get_user(&self, id: i32) -> Result<Option<User>, AppError> {
        let inner = self.inner.lock().expect("user store lock poisoned");
        Ok(inner.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.lock().expect("user store lock poisoned");
        Ok(inner
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, user: InsertUser) -> Result<User, AppError> {
        let mut inner = self.inner.lock().expect("user store lock poisoned");
        let id = inner.next_id;
        inner.next_id += 1;
        let user = User {
            id,
            username: user.username,
            password: user.password,
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }
}

/// Relational store backed by the `users` table.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStorage {
    async fn get_user(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, password FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: InsertUser) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password) VALUES ($1, $2) RETURNING id, username, password",
        )
        .bind(&user.username)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }
}
