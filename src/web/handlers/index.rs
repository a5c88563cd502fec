//! Root redirect

use axum::response::Redirect;

use crate::web::POKEDEX_PATH;

/// Send bare visits of `/` to the Pokédex search
pub async fn index() -> Redirect {
    Redirect::temporary(POKEDEX_PATH)
}
