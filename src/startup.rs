use actix_web::dev::Server;
use actix_web::{guard, middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::init_dummy_hash;
use crate::configuration::JwtSettings;
use crate::middleware::JwtMiddleware;
use crate::routes::{create_user, health_check, login, refresh, revoke, update_user};
use crate::store::{RefreshTokenStore, UserStore};

pub fn run(
    listener: TcpListener,
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    jwt_config: JwtSettings,
) -> Result<Server, std::io::Error> {
    init_dummy_hash();

    let users = web::Data::from(users);
    let refresh_tokens = web::Data::from(refresh_tokens);
    let jwt_config_data = web::Data::new(jwt_config.clone());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            // Shared state
            .app_data(users.clone())
            .app_data(refresh_tokens.clone())
            .app_data(jwt_config_data.clone())
            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    // Protected: PUT /api/users requires an access token
                    .service(
                        web::resource("/users")
                            .guard(guard::Put())
                            .route(web::put().to(update_user))
                            .wrap(JwtMiddleware::new(jwt_config.clone())),
                    )
                    .service(web::resource("/users").route(web::post().to(create_user))),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
