//! # Contact Server
//!
//! Serves the static site from the public directory and handles the
//! contact form's `POST /api/contact`, delivering each quote request by
//! SMTP.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /` | `index.html` |
//! | `GET /robots.txt`, `GET /sitemap.xml` | the files, with their content types |
//! | `GET /healthz` | `ok` |
//! | `POST /api/contact` | `{ "success": bool, "message" \| "error": string }` |
//! | anything else | static files |

pub mod config;
pub mod mail;
pub mod routes;

pub use config::{MailConfig, ServerConfig};
pub use mail::{Mailer, MailError, QuoteRequest, SmtpMailer};
pub use routes::{app, AppState};
