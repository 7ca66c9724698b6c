// Offline ingredient catalog import:
//
//     import_ingredients <ingredients.csv>
//
// Replaces the whole catalog with the rows of a `name,measurement_unit`
// file. Runs against the same DATABASE_URL as the server.

use foodgram::{init_db, parse_catalog_line, replace_ingredient_catalog_in_db};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: import_ingredients <ingredients.csv>");
            std::process::exit(2);
        }
    };
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Could not read {}: {}", path, error);
            std::process::exit(1);
        }
    };
    let entries: Vec<(String, String)> = contents.lines().filter_map(parse_catalog_line).collect();

    let pool = match init_db().await {
        Ok(pool) => pool,
        Err(error) => {
            eprintln!("Error: {}", error);
            std::process::exit(1);
        }
    };
    match replace_ingredient_catalog_in_db(&pool, &entries).await {
        Ok(count) => println!("Imported {} ingredients from {}", count, path),
        Err(error) => {
            eprintln!("Import failed: {:?}", error);
            std::process::exit(1);
        }
    }
}
