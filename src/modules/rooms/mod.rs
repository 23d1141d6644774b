pub mod controller;
pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use marquee_db::Pool;
use marquee_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use controller::RoomController;
use routes::RoomsState;

use crate::controller::GenericController;
use crate::modules::movies::models::Movie;

/// Rooms module: owns `rooms` and the `room_movies` association table
pub struct RoomsModule {
    state: RoomsState,
}

impl RoomsModule {
    pub fn new(state: RoomsState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for RoomsModule {
    fn name(&self) -> &'static str {
        "rooms"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "rooms module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
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
                    "schema": { "$ref": "#/components/schemas/RoomInput" }
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
                        "summary": "Create a room",
                        "tags": ["Rooms"],
                        "requestBody": input_body,
                        "responses": {
                            "201": {
                                "description": "Id of the new room",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            },
                            "400": error
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get room by id",
                        "tags": ["Rooms"],
                        "parameters": [id_param],
                        "responses": {
                            "200": {
                                "description": "Room with its movies",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Room" }
                                    }
                                }
                            },
                            "404": error
                        }
                    },
                    "put": {
                        "summary": "Update room by id",
                        "tags": ["Rooms"],
                        "parameters": [id_param],
                        "requestBody": input_body,
                        "responses": { "200": boolean, "400": error, "404": error }
                    },
                    "delete": {
                        "summary": "Delete a room by id",
                        "tags": ["Rooms"],
                        "parameters": [id_param],
                        "responses": { "200": boolean, "404": error }
                    }
                },
                "/all/{page}": {
                    "get": {
                        "summary": "Get all rooms",
                        "tags": ["Rooms"],
                        "parameters": [{
                            "name": "page", "in": "path", "required": true,
                            "schema": { "type": "integer", "minimum": 1 }
                        }],
                        "responses": {
                            "200": {
                                "description": "One page of rooms",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/RoomPage" }
                                    }
                                }
                            },
                            "400": error
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Rooms health check",
                        "tags": ["Rooms"],
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
                    "Room": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "number": { "type": "integer", "minimum": 1, "maximum": 65535 },
                            "description": { "type": "string" },
                            "movies": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Movie" }
                            }
                        },
                        "required": ["id", "number", "description", "movies"]
                    },
                    "RoomInput": {
                        "type": "object",
                        "properties": {
                            "number": { "type": "integer", "minimum": 1, "maximum": 65535 },
                            "description": { "type": "string" },
                            "moviesId": { "type": "array", "items": { "type": "string" } }
                        },
                        "required": ["number", "description"]
                    },
                    "RoomPage": {
                        "type": "object",
                        "properties": {
                            "total": { "type": "integer" },
                            "page": { "type": "integer" },
                            "registers": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Room" }
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
                CREATE TABLE rooms (
                    id          TEXT PRIMARY KEY NOT NULL,
                    number      INTEGER NOT NULL,
                    description TEXT NOT NULL
                );
                CREATE TABLE room_movies (
                    fk_room_id  TEXT NOT NULL REFERENCES rooms(id),
                    fk_movie_id TEXT NOT NULL REFERENCES movies(id) ON DELETE CASCADE
                );
                CREATE INDEX room_movies_room ON room_movies(fk_room_id);
                CREATE INDEX room_movies_movie ON room_movies(fk_movie_id);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "rooms module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "rooms module stopped");
        Ok(())
    }
}

/// Create a new instance of the rooms module
///
/// Movie ids are resolved through `movies` on both read and write paths.
pub fn create_module(pool: Pool, movies: Arc<dyn GenericController<Movie>>) -> Arc<RoomsModule> {
    let rooms = Arc::new(RoomController::new(pool, movies.clone()));
    Arc::new(RoomsModule::new(RoomsState { rooms, movies }))
}
