//! Observability for the game server.
//!
//! # Metrics
//!
//! | Metric | Type | Labels | Purpose |
//! |--------|------|--------|---------|
//! | `gs_http_requests_total` | Counter | `method`, `endpoint`, `status_code` | HTTP responses |
//! | `gs_http_request_duration_seconds` | Histogram | `method`, `endpoint`, `status` | HTTP latency |
//! | `gs_games_created_total` | Counter | none | Games created via `/create` |
//! | `gs_games_deleted_total` | Counter | `reason` | Games torn down |
//! | `gs_active_games` | Gauge | none | Games held in memory |
//! | `gs_active_connections` | Gauge | none | Admitted WebSocket connections |
//! | `gs_connections_total` | Counter | `outcome` | Connection admission results |
//! | `gs_moves_total` | Counter | `outcome` | Accepted and ignored moves |
//! | `gs_malformed_messages_total` | Counter | none | Undecodable inbound frames |
//! | `gs_broadcast_failures_total` | Counter | `reason` | Dropped outbound messages |
//! | `gs_transition_duration_seconds` | Histogram | `event` | Time under the coordinator lock |

pub mod metrics;
