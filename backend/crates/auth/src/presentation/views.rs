//! Page bodies for the account forms

pub fn register_body() -> &'static str {
    r#"<h1>Join Magic Fitness Gym</h1>
<form method="post" action="/register">
<label>Username <input type="text" name="username" required></label>
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<label>Confirm Password <input type="password" name="confirm_pass" required></label>
<button type="submit">Register</button>
</form>
<p>Already a member? <a href="/login">Login</a></p>"#
}

pub fn login_body() -> &'static str {
    r#"<h1>Welcome Back</h1>
<form method="post" action="/login">
<label>Username <input type="text" name="username" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Login</button>
</form>
<p>New here? <a href="/register">Register</a></p>"#
}
