//! Sample string tables.

pub const TITLE_WORDS: &[&str] = &[
    "Midnight", "Shadow", "River", "Empire", "Last", "Silent", "Broken", "Golden", "Secret",
    "Summer", "Winter", "Iron", "Glass", "Lost", "Hidden", "Northern", "Crimson", "Paper",
    "Electric", "Wild", "City", "Garden", "Storm", "Dream", "Ghost", "Heart", "Kingdom",
    "Light", "Night", "Ocean", "Road", "Star", "Stone", "Time", "War", "World", "Fire",
    "Machine", "Mirror", "Moon", "Highway", "Harbor", "Signal", "Valley", "Tower", "Echo",
    "Island", "Frontier", "Saint", "Thunder", "Velvet", "Wolf", "Blood", "Silver", "Desert",
    "Circus", "Letter", "Promise", "Return", "Rising", "Falling", "Journey", "Legacy",
];

pub const TITLE_CONNECTORS: &[&str] = &["of the", "and the", "in the", "for", "beyond the"];

pub const GENRES: &[&str] = &[
    "Drama", "Comedy", "Documentary", "Action", "Romance", "Thriller", "Crime", "Horror",
    "Adventure", "Family", "Animation", "Mystery", "Sci-Fi", "Fantasy", "Biography",
    "History", "Music", "War", "Western", "Sport", "Musical", "Film-Noir",
];

pub const TITLE_TYPES: &[&str] = &[
    "movie", "short", "tvSeries", "tvEpisode", "tvMovie", "video", "videoGame",
];

pub const TITLE_TYPE_WEIGHTS: &[f64] = &[0.30, 0.15, 0.08, 0.35, 0.06, 0.04, 0.02];

pub const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Carlos", "Sofia", "Hiroshi", "Yuki", "Ahmed", "Fatima", "Ivan", "Olga", "Pierre", "Claire",
    "Giulia", "Marco", "Ana", "Lucas", "Priya", "Arjun", "Mei", "Wei", "Ingrid", "Lars",
    "Amara", "Kwame", "Noah", "Emma", "Liam", "Olivia", "Mateo", "Isabella", "Omar", "Leila",
];

pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Taylor", "Moore", "Jackson",
    "Martin", "Lee", "Thompson", "White", "Harris", "Clark", "Lewis", "Walker", "Young",
    "Tanaka", "Suzuki", "Kim", "Park", "Chen", "Wang", "Singh", "Patel", "Ivanov", "Petrov",
    "Dubois", "Moreau", "Rossi", "Bianchi", "Silva", "Santos", "Muller", "Schmidt", "Nielsen",
    "Okafor", "Mensah", "Haddad", "Novak", "Kowalski",
];

pub const PROFESSIONS: &[&str] = &[
    "actor", "actress", "director", "writer", "producer", "composer", "cinematographer",
    "editor", "production_designer", "casting_director", "stunts", "soundtrack",
    "art_director", "make_up_department", "visual_effects",
];

pub const SITES: &[&str] = &[
    "news.example.com", "shop.example.net", "auto.example.org", "weather.example.com",
    "video.example.tv", "maps.example.com", "mail.example.com", "sport.example.org",
    "games.example.net", "music.example.fm", "travel.example.com", "realty.example.org",
    "jobs.example.com", "forum.example.net", "market.example.com", "kids.example.org",
];

pub const PAGE_PATHS: &[&str] = &[
    "", "index.html", "catalog", "catalog/item", "news/today", "news/world", "search",
    "cart", "account/login", "account/profile", "help", "contacts", "category/sale",
    "video/watch", "forum/thread", "blog/post", "photos/album",
];

pub const PAGE_TOPICS: &[&str] = &[
    "Home", "News", "Catalog", "Weather forecast", "Online store", "Video", "Music",
    "Car sales", "Real estate", "Job listings", "Forum", "Travel deals", "Sport results",
    "Recipes", "Photo gallery",
];

pub const SEARCH_TERMS: &[&str] = &[
    "buy", "cheap", "online", "free", "download", "weather", "news", "car", "flat", "rent",
    "phone", "laptop", "recipe", "movie", "music", "tickets", "hotel", "flights", "jobs",
    "map", "price", "review", "sale", "used", "new", "best", "near", "me", "today", "2013",
];

pub const SEARCH_ENGINES: &[(u16, &str)] = &[
    (2, "search.example.com"),
    (3, "find.example.net"),
    (13, "seek.example.org"),
];

pub const SOCIAL_SITES: &[&str] = &[
    "social.example.com", "friends.example.net", "photos.example.org", "blogs.example.com",
];

pub const MOBILE_MODELS: &[&str] = &[
    "iPhone", "iPhone 4S", "iPhone 5", "Galaxy S III", "Galaxy S4", "Lumia 920", "Nexus 4",
    "Xperia Z", "HTC One", "Optimus G",
];

pub const TABLET_MODELS: &[&str] = &["iPad", "iPad mini", "Galaxy Tab", "Nexus 7", "Kindle Fire"];
