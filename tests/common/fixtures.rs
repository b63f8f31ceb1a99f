//! Descriptor fixtures

/// Minimal valid descriptor
#[allow(dead_code)]
pub const VALID_DESCRIPTOR: &str = r#"{
  "name": "shop",
  "server": { "host": "203.0.113.10", "user": "deploy", "port": 22 },
  "deploy": { "path": "/var/www/shop" },
  "env": { "PORT": 4000 }
}
"#;

/// Descriptor without `server.host`
#[allow(dead_code)]
pub const MISSING_HOST_DESCRIPTOR: &str = r#"{
  "server": { "user": "deploy" },
  "deploy": { "path": "/var/www/shop" }
}
"#;
