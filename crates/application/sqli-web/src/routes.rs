//! Route definitions for the lab server

/// All routes defined in the application
pub const ROUTES: &[(&str, &str, &str)] = &[
    // Page routes
    ("GET", "/", "Landing page with both login forms"),
    ("GET", "/monitor", "Security dashboard (auto-refresh)"),

    // Login endpoints
    ("POST", "/login", "Vulnerable login (interpolated SQL)"),
    ("POST", "/login-safe", "Protected login (bound parameters)"),

    // API routes
    ("GET", "/api/logs", "Attempt log JSON feed"),
    ("POST", "/api/logs/clear", "Empty the attempt log"),
    ("GET", "/api/health", "Health check"),
];

/// Print all routes
pub fn print_routes() {
    println!("\nSQL Injection Lab Routes:");
    println!("{:-<60}", "");
    for (method, path, desc) in ROUTES {
        println!("{:6} {:20} {}", method, path, desc);
    }
    println!();
}
