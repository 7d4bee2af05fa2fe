//! Page bodies for the public pages and the purchase flow

use platform::view::escape_html;

use crate::domain::plan::{Plan, PurchaseDetails};

pub fn home_body() -> &'static str {
    r#"<h1>Magic Fitness Gym</h1>
<p>Train hard, train smart. Equipment, coaching and diet plans under one roof.</p>
<p><a href="/buy">See our plans</a></p>"#
}

pub fn about_body() -> &'static str {
    r#"<h1>About Us</h1>
<p>Magic Fitness Gym has helped members reach their goals with certified trainers,
modern equipment and personalised diet plans.</p>"#
}

pub fn contact_body() -> &'static str {
    r#"<h1>Contact Us</h1>
<form method="post" action="/contact">
<label>Name <input type="text" name="name" required></label>
<label>Email <input type="email" name="email" required></label>
<label>Age <input type="number" name="age" min="1" required></label>
<label>Contact Number <input type="tel" name="contact" required></label>
<label>Address <input type="text" name="address"></label>
<label>Message <textarea name="mail_data" required></textarea></label>
<button type="submit">Send</button>
</form>"#
}

pub fn buy_body() -> String {
    let cards: String = Plan::ALL
        .iter()
        .map(|plan| {
            format!(
                r#"<section class="plan">
<h2>{label}</h2>
<p class="price">&#8377; {price}</p>
{features}
<form method="post" action="/buy?plan={code}&amp;price={price}"><button type="submit">Buy</button></form>
</section>
"#,
                label = plan.label(),
                price = plan.price(),
                code = plan.code(),
                features = feature_list(*plan),
            )
        })
        .collect();

    format!("<h1>Membership Plans</h1>\n{cards}")
}

pub fn purchase_body(details: &PurchaseDetails) -> String {
    let Some(plan) = details.plan else {
        return r#"<h1>Purchase</h1>
<p>No plan selected yet. <a href="/buy">Choose a plan</a></p>"#
            .to_string();
    };

    format!(
        r#"<h1>Purchase</h1>
<dl>
<dt>Customer</dt><dd>{customer}</dd>
<dt>Email</dt><dd>{email}</dd>
<dt>Plan</dt><dd>{label}</dd>
<dt>Price</dt><dd>&#8377; {price}</dd>
</dl>
{features}
<form method="post" action="/purchase">
<label>Name <input type="text" name="name" value="{customer}" required></label>
<label>Email <input type="email" name="email" value="{email}" required></label>
<label>Contact Number <input type="tel" name="contact" required></label>
<label>Address <input type="text" name="address" required></label>
<button type="submit">Confirm Purchase</button>
</form>"#,
        customer = escape_html(&details.customer),
        email = escape_html(&details.email),
        label = plan.label(),
        price = plan.price(),
        features = feature_list(plan),
    )
}

pub fn not_found_body() -> &'static str {
    r#"<h1>404</h1>
<p>This page does not exist. <a href="/home">Back to home</a></p>"#
}

fn feature_list(plan: Plan) -> String {
    let items: String = plan
        .features()
        .iter()
        .map(|f| format!("<li>{}</li>", escape_html(f)))
        .collect();
    format!("<ul>{items}</ul>")
}
