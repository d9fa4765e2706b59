use actix_web::http::Method;

pub const ROUTES: [&str; 4] = [
    "POST /webhook",
    "POST /api/webhook",
    "GET /transaction/{signature}",
    "GET /api/tx/{signature}",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Preflight,
    Webhook,
    /// Query by signature; empty when the path ends at the collection segment.
    Transaction(String),
    NotFound,
}

/// Resolves requests regardless of the base path the service is mounted under.
#[derive(Debug, Clone, Default)]
pub struct Router {
    prefixes: Vec<String>,
}

impl Router {
    pub fn new(function_name: Option<&str>) -> Self {
        let mut prefixes = vec!["/.netlify/functions".to_string()];
        if let Some(name) = function_name {
            prefixes.push(format!("/.netlify/functions/{}", name));
            prefixes.push(format!("/{}", name));
        }
        // Longest first so the most specific prefix is stripped.
        prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));

        Self { prefixes }
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Route {
        if *method == Method::OPTIONS {
            return Route::Preflight;
        }

        let path = self.strip_prefix(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let segments = match segments.split_first() {
            Some((&"api", rest)) => rest,
            _ => &segments[..],
        };

        match segments {
            ["webhook"] if *method == Method::POST => Route::Webhook,
            ["transaction" | "tx"] if *method == Method::GET => Route::Transaction(String::new()),
            ["transaction" | "tx", signature] if *method == Method::GET => {
                Route::Transaction(signature.to_string())
            }
            _ => Route::NotFound,
        }
    }

    fn strip_prefix<'a>(&self, path: &'a str) -> &'a str {
        self.prefixes
            .iter()
            .find_map(|prefix| {
                path.strip_prefix(prefix.as_str())
                    .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            })
            .unwrap_or(path)
    }
}
