// ============================
// guichet-lib/src/views.rs
// ============================
//! Inline HTML views for the gateway pages.
use crate::flow::Profile;

fn base_style() -> &'static str {
    r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
        background: #f5f5f5; color: #333;
        display: flex; justify-content: center; align-items: center;
        min-height: 100vh; padding: 20px;
    }
    .card {
        background: #fff; border-radius: 16px; padding: 32px;
        max-width: 400px; width: 100%; box-shadow: 0 4px 24px rgba(0,0,0,0.08);
    }
    .logo { text-align: center; margin-bottom: 24px; }
    .logo h1 { font-size: 28px; color: #1a1a2e; }
    .logo p { font-size: 14px; color: #666; margin-top: 4px; }
    .form-group { margin-bottom: 16px; }
    .form-group label { display: block; font-size: 14px; font-weight: 500; margin-bottom: 6px; color: #444; }
    .form-group input {
        width: 100%; padding: 12px 14px; border: 1.5px solid #ddd;
        border-radius: 10px; font-size: 16px; outline: none;
    }
    .form-group input:focus { border-color: #4a6cf7; }
    .btn {
        width: 100%; padding: 14px; border: none; border-radius: 10px;
        font-size: 16px; font-weight: 600; cursor: pointer;
        background: #4a6cf7; color: #fff;
    }
    .btn:hover { background: #3b5de7; }
    .flash { background: #f0f4ff; color: #1a1a2e; padding: 10px 14px; border-radius: 8px; font-size: 13px; margin-bottom: 16px; }
    .link { text-align: center; margin-top: 16px; font-size: 14px; color: #666; }
    .link a { color: #4a6cf7; text-decoration: none; }
    .link a:hover { text-decoration: underline; }
    .profile-row { padding: 10px 0; border-bottom: 1px solid #eee; font-size: 15px; }
    .profile-row span { color: #999; font-size: 13px; display: block; }
    "#
}

/// Escape text interpolated into HTML.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn flash_html(flash: Option<&str>) -> String {
    flash
        .map(|message| format!(r#"<div class="flash">{}</div>"#, escape_html(message)))
        .unwrap_or_default()
}

/// The login form, served at `/`.
pub fn login_page(flash: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>Guichet - Log In</title>
<style>{style}</style>
</head><body>
<div class="card">
  <div class="logo"><h1>Guichet</h1><p>Log in to your account</p></div>
  {flash}
  <form method="POST" action="/connexion">
    <div class="form-group">
      <label>Username</label>
      <input type="text" name="username" required autocomplete="username" placeholder="Enter username">
    </div>
    <div class="form-group">
      <label>Password</label>
      <input type="password" name="password" required autocomplete="current-password" placeholder="Enter password">
    </div>
    <button type="submit" class="btn">Log In</button>
  </form>
  <div class="link">
    No account yet?<br>
    <a href="/inscription">Create one</a>
  </div>
</div>
</body></html>"#,
        style = base_style(),
        flash = flash_html(flash),
    )
}

/// The registration form, served at `/inscription`.
pub fn register_page(flash: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>Guichet - Sign Up</title>
<style>{style}</style>
</head><body>
<div class="card">
  <div class="logo"><h1>Guichet</h1><p>Create an account</p></div>
  {flash}
  <form method="POST" action="/inscription">
    <div class="form-group">
      <label>Username</label>
      <input type="text" name="username" required autocomplete="username" placeholder="Choose a username">
    </div>
    <div class="form-group">
      <label>Password</label>
      <input type="password" name="password" required autocomplete="new-password" placeholder="Choose a password">
    </div>
    <button type="submit" class="btn">Create Account</button>
  </form>
  <div class="link">
    Already have an account?<br>
    <a href="/">Log in</a>
  </div>
</div>
</body></html>"#,
        style = base_style(),
        flash = flash_html(flash),
    )
}

/// The profile view, served at `/profil`. Shows id and username only.
pub fn profile_page(profile: &Profile) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>Guichet - Profile</title>
<style>{style}</style>
</head><body>
<div class="card">
  <div class="logo"><h1>Guichet</h1><p>Your profile</p></div>
  <div class="profile-row"><span>User id</span>{id}</div>
  <div class="profile-row"><span>Username</span>{username}</div>
  <div class="link"><a href="/">Back to login</a></div>
</div>
</body></html>"#,
        style = base_style(),
        id = profile.id,
        username = escape_html(&profile.username),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_posts_to_connexion() {
        let page = login_page(None);
        assert!(page.contains(r#"action="/connexion""#));
        assert!(!page.contains("class=\"flash\""));
    }

    #[test]
    fn register_page_posts_to_inscription() {
        let page = register_page(None);
        assert!(page.contains(r#"action="/inscription""#));
    }

    #[test]
    fn flash_is_rendered_and_escaped() {
        let page = login_page(Some("Username '<bob>' is already taken."));
        assert!(page.contains("class=\"flash\""));
        assert!(page.contains("&lt;bob&gt;"));
        assert!(!page.contains("'<bob>'"));
    }

    #[test]
    fn profile_page_shows_id_and_username() {
        let profile = Profile {
            id: 7,
            username: "alice".to_string(),
        };
        let page = profile_page(&profile);
        assert!(page.contains("alice"));
        assert!(page.contains('7'));
    }

    #[test]
    fn profile_username_is_escaped() {
        let profile = Profile {
            id: 1,
            username: "<script>alert(1)</script>".to_string(),
        };
        let page = profile_page(&profile);
        assert!(!page.contains("<script>alert"));
        assert!(page.contains("&lt;script&gt;"));
    }
}
