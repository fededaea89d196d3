use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use spdlog::{Level, LevelFilter};

use blogpad::client::auth::{Auth, Registration};
use blogpad::client::session::FileKeyValueStore;
use blogpad::client::user_service::UserProfile;
use blogpad::client::ApiClient;
use blogpad::config::open_config;
use blogpad::paginator::Paginator;
use blogpad::view::enrich::{Author, EnrichedPost};
use blogpad::view::list_renderer::{ListRenderer, LIST_TEMPLATE};
use blogpad::view::listing::ListingView;
use blogpad::view::post_renderer::{PostRenderer, VIEW_TEMPLATE};
use blogpad::view::render_screen;

#[derive(Parser, Debug)]
#[command(version, about = "Browse a Blogpad server from the terminal", long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    /// Log progress to the console
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and keep the session
    Login {
        email: String,
        password: String,
    },
    /// Create an account and keep the session
    Register {
        username: String,
        email: String,
        password: String,
        #[arg(long)]
        profile_picture: Option<String>,
    },
    /// Forget the current session
    Logout,
    /// Show the logged in user
    Whoami,
    /// List all blogs, one page at a time
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show one blog
    Show {
        id: String,
    },
    /// List the blogs of the logged in user
    Mine {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
}

fn set_console_level(verbose: bool) {
    let level = if verbose { Level::Debug } else { Level::Warn };
    spdlog::default_logger().set_level_filter(LevelFilter::MoreSevereEqual(level));
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    set_console_level(args.verbose);

    let config = open_config(args.config_path.map(PathBuf::from)).map_err(|e| anyhow!(e))?;
    let client_cfg = config.client();
    let page_size = client_cfg.page_size();
    let session_path = config.session.location
        .ok_or_else(|| anyhow!("No session location configured"))?;

    let api = ApiClient::new(&client_cfg.base_url);
    let mut auth = Auth::new(api.clone(), FileKeyValueStore::open(&session_path)?);

    let list_renderer = ListRenderer::new(LIST_TEMPLATE)?;
    let post_renderer = PostRenderer::new(VIEW_TEMPLATE)?;

    match args.command {
        Command::Login { email, password } => {
            let session = auth.login(&email, &password).await?;
            println!("Logged in as {}", session.username);
        }
        Command::Register { username, email, password, profile_picture } => {
            let registration = Registration { username, email, password, profile_picture };
            let session = auth.register(&registration).await?;
            println!("Registered and logged in as {}", session.username);
        }
        Command::Logout => {
            auth.logout()?;
            println!("Logged out");
        }
        Command::Whoami => match auth.current() {
            Some(session) => println!("{} ({})", session.username, session.user_id),
            None => println!("Not logged in"),
        },
        Command::List { page } => {
            let mut view = ListingView::new(api.clone(), api, page_size);
            view.activate().await;
            if let Err(e) = view.set_page(page) {
                if view.page_count() > 0 {
                    bail!("Invalid page {}: {}", page, e);
                }
            }
            println!("{}", render_screen(&view.screen(), &list_renderer, &post_renderer));
        }
        Command::Show { id } => {
            let mut view = ListingView::new(api.clone(), api, page_size);
            view.select(&id).await;
            println!("{}", render_screen(&view.screen(), &list_renderer, &post_renderer));
        }
        Command::Mine { page } => {
            let Some(session) = auth.current() else {
                bail!("Not logged in. Please run blogpad-browse login");
            };
            let author = Author::from_profile(Some(UserProfile {
                username: Some(session.username.clone()),
                profile_picture: Some(session.profile_picture.clone()),
            }));
            let posts: Vec<EnrichedPost> = api.fetch_user_blogs(&session.user_id).await?
                .into_iter()
                .map(|blog| EnrichedPost { blog, author: author.clone() })
                .collect();

            let paginator = Paginator::from(&posts, page_size);
            let page_posts: &[EnrichedPost] = match paginator.get_page(page) {
                Ok(page_posts) => page_posts,
                Err(_) if paginator.page_count() == 0 => &[],
                Err(e) => bail!("Invalid page {}: {}", page, e),
            };
            println!("{}", list_renderer.render(page_posts, page, paginator.page_count()));
        }
    }

    Ok(())
}
