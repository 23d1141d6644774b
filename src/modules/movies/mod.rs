pub mod controller;
pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use marquee_db::Pool;
use marquee_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use controller::MovieController;
use models::Movie;

use crate::controller::GenericController;

/// Movies module: owns the `movies` table and its CRUD routes
pub struct MoviesModule {
    controller: Arc<MovieController>,
}

impl MoviesModule {
    pub fn new(controller: Arc<MovieController>) -> Self {
        Self { controller }
    }

    /// The controller as the generic contract other modules depend on
    pub fn controller(&self) -> Arc<dyn GenericController<Movie>> {
        self.controller.clone()
    }
}

#[async_trait]
impl Module for MoviesModule {
    fn name(&self) -> &'static str {
        "movies"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "movies module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.controller())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "description": "Error",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let id_param = json!({
            "name": "id", "in": "path", "required": true, "schema": { "type": "string" }
        });
        let input_body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/MovieInput" }
                }
            }
        });
        let boolean = json!({
            "description": "OK",
            "content": { "application/json": { "schema": { "type": "boolean" } } }
        });

        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Create a movie",
                        "tags": ["Movies"],
                        "requestBody": input_body,
                        "responses": {
                            "201": {
                                "description": "Id of the new movie",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            },
                            "400": error
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get movie by id",
                        "tags": ["Movies"],
                        "parameters": [id_param],
                        "responses": {
                            "200": {
                                "description": "Movie",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Movie" }
                                    }
                                }
                            },
                            "404": error
                        }
                    },
                    "put": {
                        "summary": "Update movie by id",
                        "tags": ["Movies"],
                        "parameters": [id_param],
                        "requestBody": input_body,
                        "responses": { "200": boolean, "400": error, "404": error }
                    },
                    "delete": {
                        "summary": "Delete movie by id",
                        "tags": ["Movies"],
                        "parameters": [id_param],
                        "responses": { "200": boolean, "404": error }
                    }
                },
                "/all/{page}": {
                    "get": {
                        "summary": "List movies, ten per page",
                        "tags": ["Movies"],
                        "parameters": [{
                            "name": "page", "in": "path", "required": true,
                            "schema": { "type": "integer", "minimum": 1 }
                        }],
                        "responses": {
                            "200": {
                                "description": "One page of movies",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/MoviePage" }
                                    }
                                }
                            },
                            "400": error
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Movies health check",
                        "tags": ["Movies"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Movie": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "director": { "type": "string" },
                            "durationInSeconds": { "type": "integer", "minimum": 1, "maximum": 65535 },
                            "durationInHours": { "type": "string" }
                        },
                        "required": ["id", "name", "director", "durationInSeconds", "durationInHours"]
                    },
                    "MovieInput": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "director": { "type": "string" },
                            "durationInSeconds": { "type": "integer", "minimum": 1, "maximum": 65535 }
                        },
                        "required": ["name", "director", "durationInSeconds"]
                    },
                    "MoviePage": {
                        "type": "object",
                        "properties": {
                            "total": { "type": "integer" },
                            "page": { "type": "integer" },
                            "registers": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Movie" }
                            }
                        },
                        "required": ["total", "page", "registers"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE movies (
                    id                  TEXT PRIMARY KEY NOT NULL,
                    name                TEXT NOT NULL,
                    director            TEXT NOT NULL,
                    duration_in_seconds INTEGER NOT NULL
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "movies module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "movies module stopped");
        Ok(())
    }
}

/// Create a new instance of the movies module
pub fn create_module(pool: Pool) -> Arc<MoviesModule> {
    Arc::new(MoviesModule::new(Arc::new(MovieController::new(pool))))
}
