use propbind::{BindingDescriptor, PropertyLoader, PropertyType};

#[derive(Debug, Default)]
struct AppConfig {
    name: String,
    port: i32,
    debug: bool,
    greeting: String,
    db_url: String,
    db_timeout: f64,
    pool_size: i32,
}

fn main() -> Result<(), propbind::ConfigError> {
    let config: AppConfig = PropertyLoader::builder()
        .with_resource_root("demos/resources")
        .bind(
            BindingDescriptor::new("app.name").required(true),
            |c: &mut AppConfig, v| c.name = v,
        )
        .bind(
            BindingDescriptor::new("app.port")
                .kind(PropertyType::Int)
                .required(true),
            |c: &mut AppConfig, v| c.port = v,
        )
        .bind(
            BindingDescriptor::new("app.debug").kind(PropertyType::Boolean),
            |c: &mut AppConfig, v| c.debug = v,
        )
        .bind(BindingDescriptor::new("greeting"), |c: &mut AppConfig, v| {
            c.greeting = v
        })
        .bind(
            BindingDescriptor::new("db.url")
                .file("database.properties")
                .required(true),
            |c: &mut AppConfig, v| c.db_url = v,
        )
        .bind(
            BindingDescriptor::new("db.timeout")
                .file("database.properties")
                .kind(PropertyType::Double),
            |c: &mut AppConfig, v| c.db_timeout = v,
        )
        .bind(
            BindingDescriptor::new("db.pool")
                .file("database.properties")
                .kind(PropertyType::Int)
                .default_value("10"),
            |c: &mut AppConfig, v| c.pool_size = v,
        )
        .load()?;

    println!("{} on port {} (debug={})", config.name, config.port, config.debug);
    println!("{}", config.greeting);
    println!(
        "database {} (timeout={}s, pool={})",
        config.db_url, config.db_timeout, config.pool_size
    );

    Ok(())
}
