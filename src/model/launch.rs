/// Flags forwarded to the query app, as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchConfig {
    pub share: bool,
    /// Raw `user:pass` (or `u1:p1,u2:p2`), passed through untouched.
    pub auth: Option<String>,
    pub host: Option<String>,
    /// Kept as text; the app validates it.
    pub port: Option<String>,
}

impl LaunchConfig {
    /// Argument vector for the app, always in `share, auth, host, port` order.
    pub fn forwarded_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.share {
            args.push("--share".to_string());
        }
        for (flag, value) in [
            ("--auth", &self.auth),
            ("--host", &self.host),
            ("--port", &self.port),
        ] {
            if let Some(value) = value {
                args.push(flag.to_string());
                args.push(value.clone());
            }
        }
        args
    }
}
