//! Writes a small deterministic `netflix_titles.csv` so the app can be tried
//! without downloading the Kaggle export.

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }
}

const TYPES: &[&str] = &["Movie", "Movie", "Movie", "TV Show", "TV Show"];
const RATINGS: &[&str] = &["G", "PG", "PG-13", "R", "TV-MA", "TV-14", "TV-PG"];
const GENRES: &[&str] = &[
    "Dramas",
    "Comedies",
    "Documentaries",
    "Action & Adventure",
    "International Movies",
    "Thrillers",
    "Kids' TV",
    "Romantic Movies",
];
const COUNTRIES: &[&str] = &[
    "United States",
    "India",
    "United Kingdom",
    "Spain",
    "France",
    "Japan",
    "South Korea",
    "Mexico",
];
const MONTHS: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_titles = 120;

    let output_path = "netflix_titles.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    writer
        .write_record([
            "show_id",
            "type",
            "title",
            "rating",
            "release_year",
            "date_added",
            "listed_in",
            "country",
        ])
        .expect("Failed to write header");

    for i in 0..n_titles {
        let ty = *rng.pick(TYPES);
        let title = format!("Sample Title {}", i + 1);
        let rating = *rng.pick(RATINGS);
        let release_year = rng.range(1990, 2021).to_string();

        // Sprinkle in missing dates so cleaning has something to null out.
        let date_added = if rng.range(0, 9) == 0 {
            String::new()
        } else {
            format!(
                "{} {}, {}",
                rng.pick(MONTHS),
                rng.range(1, 28),
                rng.range(2015, 2021)
            )
        };

        let mut genres = vec![*rng.pick(GENRES)];
        if rng.range(0, 1) == 1 {
            let extra = *rng.pick(GENRES);
            if !genres.contains(&extra) {
                genres.push(extra);
            }
        }
        let listed_in = genres.join(", ");

        let mut countries = vec![*rng.pick(COUNTRIES)];
        if rng.range(0, 3) == 0 {
            let extra = *rng.pick(COUNTRIES);
            if !countries.contains(&extra) {
                countries.push(extra);
            }
        }
        let country = countries.join(", ");

        let show_id = format!("s{}", i + 1);
        writer
            .write_record([
                show_id.as_str(),
                ty,
                title.as_str(),
                rating,
                release_year.as_str(),
                date_added.as_str(),
                listed_in.as_str(),
                country.as_str(),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {n_titles} titles to {output_path}");
}
