//! HTML templates for the lab
//!
//! Pages are plain server-rendered HTML. Everything that came from a request
//! goes through `html_escape` before it is written into a page.

use sqli_core::{AttemptRecord, Channel, Outcome, RuleHits, Summary};
use sqli_db::User;

/// CSS styles
pub const STYLE_CSS: &str = r#"
:root {
    --bg: #ffffff;
    --bg-card: #fafafa;
    --text: #1a1a1a;
    --text-secondary: #666;
    --border: #e5e5e5;
    --danger: #d93025;
    --warning: #e8a200;
    --success: #188038;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: 'Inter', -apple-system, sans-serif;
    background: var(--bg);
    color: var(--text);
    min-height: 100vh;
    line-height: 1.6;
    padding: 40px 20px;
}

.container { max-width: 1100px; margin: 0 auto; }

.header { text-align: center; margin-bottom: 40px; }
.header p { color: var(--text-secondary); }

.grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
    gap: 24px;
}

.card {
    background: var(--bg-card);
    border: 1px solid var(--border);
    border-radius: 16px;
    padding: 28px;
}

.card-header { display: flex; align-items: center; gap: 12px; margin-bottom: 16px; }

.badge {
    display: inline-block;
    padding: 2px 10px;
    border-radius: 999px;
    font-size: 0.8rem;
    font-weight: 600;
}
.badge.vulnerable { background: #fde7e5; color: var(--danger); }
.badge.safe { background: #e6f4ea; color: var(--success); }
.badge.attack { background: var(--danger); color: #fff; }

.info-box {
    background: #fff;
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 12px 16px;
    margin-bottom: 12px;
    font-size: 0.9rem;
}
.info-box ul { margin-left: 20px; }

form label { display: block; margin-top: 12px; font-size: 0.9rem; }
form input {
    width: 100%;
    padding: 10px;
    border: 1px solid var(--border);
    border-radius: 8px;
    margin-top: 4px;
    font-family: monospace;
}
form button {
    width: 100%;
    margin-top: 16px;
    padding: 12px;
    border: none;
    border-radius: 8px;
    color: #fff;
    font-weight: 600;
    cursor: pointer;
}
.btn-vulnerable { background: var(--danger); }
.btn-safe { background: var(--success); }

a.button {
    display: inline-block;
    margin-top: 20px;
    padding: 12px 24px;
    background: var(--text);
    color: #fff;
    text-decoration: none;
    border-radius: 8px;
}

.result { max-width: 560px; margin: 60px auto; text-align: center; }
.result .detail {
    background: #fff;
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 15px;
    margin: 20px 0;
    color: var(--text-secondary);
    font-size: 0.9rem;
}

.stats { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; margin-bottom: 32px; }
.stat { background: var(--bg-card); border: 1px solid var(--border); border-radius: 12px; padding: 20px; }
.stat-label { color: var(--text-secondary); font-size: 0.85rem; }
.stat-value { font-size: 2rem; font-weight: 600; }
.stat.danger .stat-value { color: var(--danger); }
.stat.success .stat-value { color: var(--success); }

.log-entry {
    border: 1px solid var(--border);
    border-left: 4px solid var(--border);
    border-radius: 8px;
    padding: 12px 16px;
    margin-bottom: 10px;
    font-size: 0.9rem;
}
.log-entry.attack { border-left-color: var(--danger); background: #fffafa; }
.log-entry.success { border-left-color: var(--success); }
.log-time { color: var(--text-secondary); font-size: 0.8rem; }

.rule-hits { margin-bottom: 32px; }
.rule-hits li { margin-left: 20px; }

.empty { color: var(--text-secondary); text-align: center; padding: 40px; }

code { font-family: 'JetBrains Mono', monospace; background: #f1f1f1; padding: 1px 4px; border-radius: 4px; }
"#;

/// Wrap a body in the common page shell
fn page(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
    <meta charset=\"UTF-8\">
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
    <title>{}</title>
    {}
    <style>{}</style>
</head>
<body>
{}
</body>
</html>",
        html_escape(title),
        head_extra,
        STYLE_CSS,
        body
    )
}

fn login_form(action: &str, button_class: &str) -> String {
    format!(
        "<form method=\"POST\" action=\"{}\">
            <label>Username<input type=\"text\" name=\"username\" placeholder=\"Enter username\" autocomplete=\"off\"></label>
            <label>Password<input type=\"password\" name=\"password\" placeholder=\"Enter password\"></label>
            <button type=\"submit\" class=\"{}\">Sign in</button>
        </form>",
        action, button_class
    )
}

/// Landing page: vulnerable form, protected form, dashboard link
pub fn index_html() -> String {
    let body = format!(
        "<div class=\"container\">
    <div class=\"header\">
        <h1>SQL Injection Lab</h1>
        <p>Vulnerable and protected logins side by side</p>
    </div>
    <div class=\"grid\">
        <div class=\"card\">
            <div class=\"card-header\">
                <h2>Vulnerable Endpoint</h2>
                <span class=\"badge vulnerable\">Insecure</span>
            </div>
            <div class=\"info-box\">
                <strong>Test credentials</strong>
                <ul><li><code>admin</code> / <code>admin123</code></li></ul>
            </div>
            <div class=\"info-box\">
                <strong>Attack payloads</strong>
                <ul>
                    <li><code>{}</code></li>
                    <li><code>{}</code></li>
                    <li><code>{}</code></li>
                </ul>
            </div>
            {}
        </div>
        <div class=\"card\">
            <div class=\"card-header\">
                <h2>Protected Endpoint</h2>
                <span class=\"badge safe\">Secure</span>
            </div>
            <div class=\"info-box\">
                <strong>Defenses</strong>
                <ul>
                    <li>Parameterized statements</li>
                    <li>Pattern detection and logging</li>
                </ul>
            </div>
            {}
        </div>
    </div>
    <div class=\"header\" style=\"margin-top: 40px;\">
        <h3>Live Monitoring</h3>
        <a href=\"/monitor\" class=\"button\">Open Dashboard</a>
    </div>
</div>",
        html_escape("admin' OR '1'='1"),
        html_escape("admin'--"),
        html_escape("' OR 1=1--"),
        login_form("/login", "btn-vulnerable"),
        login_form("/login-safe", "btn-safe"),
    );

    page("SQL Injection Lab", "", &body)
}

fn channel_badge(channel: Channel) -> &'static str {
    match channel {
        Channel::Vulnerable => "<span class=\"badge vulnerable\">Vulnerable</span>",
        Channel::Safe => "<span class=\"badge safe\">Secure</span>",
    }
}

/// Outcome page for one login attempt
pub fn result_html(record: &AttemptRecord, user: Option<&User>) -> String {
    let (title, headline, detail) = match (record.outcome(), user) {
        (Outcome::Success, Some(user)) => (
            "Access granted",
            format!("Welcome, {}!", html_escape(&user.username)),
            format!("{} Role: {}", channel_badge(record.channel()), html_escape(&user.role)),
        ),
        (Outcome::Error, _) => (
            "Error",
            "Database error".to_string(),
            channel_badge(record.channel()).to_string(),
        ),
        _ => (
            "Access denied",
            "Invalid credentials".to_string(),
            channel_badge(record.channel()).to_string(),
        ),
    };

    let alert = if record.is_attack() {
        format!(
            "<div class=\"detail\"><span class=\"badge attack\">Attack detected</span> {}</div>",
            html_escape(&record.matched_rules().join(", "))
        )
    } else {
        String::new()
    };

    let body = format!(
        "<div class=\"card result\">
    <h1>{}</h1>
    <div class=\"detail\">{}</div>
    {}
    <a href=\"/\" class=\"button\">Back</a>
    <a href=\"/monitor\" class=\"button\">Dashboard</a>
</div>",
        headline, detail, alert
    );

    page(title, "", &body)
}

fn log_entry_html(record: &AttemptRecord) -> String {
    let class = if record.is_attack() {
        "attack"
    } else if record.outcome() == Outcome::Success {
        "success"
    } else {
        ""
    };

    let attack_badge = if record.is_attack() {
        "<span class=\"badge attack\">Attack</span> "
    } else {
        ""
    };

    let patterns = if record.matched_rules().is_empty() {
        String::new()
    } else {
        format!(
            "<div><strong>Detected patterns:</strong> {}</div>",
            html_escape(&record.matched_rules().join(", "))
        )
    };

    let query = match record.raw_query() {
        Some(sql) => format!("<div><strong>Query:</strong> <code>{}</code></div>", html_escape(sql)),
        None => String::new(),
    };

    let result = match record.outcome() {
        Outcome::Success => "&#10003; Success",
        Outcome::Failed => "&#10007; Failed",
        Outcome::Error => "&#10007; Error",
    };

    format!(
        "<div class=\"log-entry {}\">
            <div class=\"log-time\">{}</div>
            <div>{}{} <strong>User:</strong> <code>{}</code></div>
            {}
            {}
            <div><strong>Result:</strong> {}</div>
        </div>",
        class,
        record.timestamp().to_rfc3339(),
        attack_badge,
        channel_badge(record.channel()),
        html_escape(record.username()),
        patterns,
        query,
        result
    )
}

fn rule_hits_html(hits: &[RuleHits]) -> String {
    if hits.is_empty() {
        return String::new();
    }

    let items: String = hits
        .iter()
        .map(|h| format!("<li>{} <strong>{}</strong></li>", html_escape(&h.rule), h.hits))
        .collect();

    format!(
        "<div class=\"rule-hits card\"><h2>Pattern hits</h2><ul>{}</ul></div>",
        items
    )
}

/// Dashboard: counts, pattern hits and every record newest first
pub fn monitor_html(
    records: &[AttemptRecord],
    summary: &Summary,
    hits: &[RuleHits],
    refresh_secs: u64,
) -> String {
    let entries = if records.is_empty() {
        "<p class=\"empty\">No attempts recorded yet</p>".to_string()
    } else {
        records.iter().rev().map(log_entry_html).collect()
    };

    let body = format!(
        "<div class=\"container\">
    <div class=\"header\">
        <h1>Security Dashboard</h1>
        <p>Auto-refresh every {} seconds</p>
        <a href=\"/\" class=\"button\">Back</a>
    </div>
    <div class=\"stats\">
        <div class=\"stat danger\"><div class=\"stat-label\">Attacks detected</div><div class=\"stat-value\">{}</div></div>
        <div class=\"stat success\"><div class=\"stat-label\">Legitimate attempts</div><div class=\"stat-value\">{}</div></div>
        <div class=\"stat\"><div class=\"stat-label\">Total records</div><div class=\"stat-value\">{}</div></div>
    </div>
    {}
    <div class=\"logs\">
        <h2>Activity</h2>
        {}
    </div>
</div>",
        refresh_secs,
        summary.attacks,
        summary.legitimate,
        summary.total,
        rule_hits_html(hits),
        entries
    );

    let refresh = format!("<meta http-equiv=\"refresh\" content=\"{}\">", refresh_secs);
    page("Security Dashboard", &refresh, &body)
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
