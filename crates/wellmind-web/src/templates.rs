//! Page templates, compiled into the binary.

use minijinja::Environment;

pub const NAV_HTML: &str = include_str!("../templates/nav.html");

/// Build the template environment with every page registered.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("nav.html", NAV_HTML)?;
    env.add_template("landing.html", include_str!("../templates/landing.html"))?;
    env.add_template("hr.html", include_str!("../templates/hr.html"))?;
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_render() {
        let env = environment().unwrap();
        let landing = env
            .get_template("landing.html")
            .unwrap()
            .render(context! { scorer => "local heuristic", notify_mode => "background" })
            .unwrap();
        assert!(landing.contains("Check Burnout"));
        assert!(landing.contains("local heuristic"));

        let hr = env.get_template("hr.html").unwrap().render(context! {}).unwrap();
        assert!(hr.contains("/api/dashboard"));
        assert!(hr.contains("/api/employees"));
    }
}
