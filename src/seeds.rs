//! Built-in content: the playable metros, the guess selector list, the hint lineup
//! and the per-metro profiles behind the "other players" histogram.
//! Guarantees a playable round without any external config.

use std::collections::HashMap;

use crate::distribution::ScoreProfile;
use crate::domain::{HintDescriptor, MetroCatalog, MetroRecord};
use crate::session::TOTAL_HINTS;

/// Metros that can be drawn as the mystery target.
pub fn seed_catalog() -> MetroCatalog {
  MetroCatalog::new([
    metro("Memphis", "Memphis, TN", "Tennessee", [
      "FedEx keeps Memphis the global air cargo capital with the world's busiest cargo airport.",
      "Healthcare anchors like St. Jude and Methodist Le Bonheur fuel a fast-growing biosciences corridor.",
      "Advanced manufacturers and logistics firms lean on the Mississippi River port and rail crossroads for scale.",
      "Cultural energy plus low costs continue to attract professional services and tech expansions.",
    ]),
    metro("Charlotte", "Charlotte, NC", "North Carolina", [
      "Bank of America and Wells Fargo anchor Charlotte as the nation's second-largest banking center after New York.",
      "The metro's finance sector employs over 60,000 workers with competitive salaries and rapid growth.",
      "Charlotte Douglas International Airport is a major American Airlines hub, driving logistics employment.",
      "Healthcare systems like Atrium Health are expanding rapidly, creating thousands of high-skill jobs.",
    ]),
    metro("DC", "Washington DC", "District of Columbia", [
      "Federal government agencies dominate employment with over 350,000 workers in the metro area.",
      "The highest average salaries in the dataset reflect government and contractor pay premiums.",
      "Professional services firms like Booz Allen Hamilton cluster around federal contracts.",
      "Technology sector growing rapidly as defense and intelligence agencies modernize systems.",
    ]),
    metro("Pittsburgh", "Pittsburgh, PA", "Pennsylvania", [
      "UPMC (University of Pittsburgh Medical Center) is the region's largest employer with over 40,000 workers.",
      "Carnegie Mellon and University of Pittsburgh anchor a growing tech and robotics ecosystem.",
      "Healthcare and education sectors dominate, creating stable, high-skill employment.",
      "Former steel town successfully transitioned to 'eds and meds' economy with tech growth.",
    ]),
    metro("Houston", "Houston, TX", "Texas", [
      "ExxonMobil, Shell, and dozens of energy companies make Houston the global energy capital.",
      "The energy sector provides high-paying jobs with strong five-year growth projections.",
      "MD Anderson Cancer Center and Texas Medical Center create a healthcare employment powerhouse.",
      "Port of Houston ranks first in U.S. foreign tonnage, driving massive logistics employment.",
    ]),
  ])
}

fn metro(id: &str, name: &str, state: &str, highlights: [&str; 4]) -> (String, MetroRecord) {
  (
    id.to_string(),
    MetroRecord {
      name: name.into(),
      state: state.into(),
      highlights: highlights.iter().map(|h| h.to_string()).collect(),
    },
  )
}

/// Every metro offered in the guess selector (US metros, "City, ST").
pub const GUESS_OPTION_NAMES: &[&str] = &[
  "Akron, OH", "Albany, NY", "Albuquerque, NM", "Allentown, PA", "Amarillo, TX", "Anchorage, AK",
  "Ann Arbor, MI", "Asheville, NC", "Atlanta, GA", "Augusta, GA", "Austin, TX",
  "Bakersfield, CA", "Baltimore, MD", "Baton Rouge, LA", "Beaumont, TX", "Boise, ID",
  "Boston, MA", "Boulder, CO", "Bridgeport, CT", "Brownsville, TX", "Buffalo, NY",
  "Cape Coral, FL", "Cedar Rapids, IA", "Charleston, SC", "Charlotte, NC", "Chattanooga, TN",
  "Chicago, IL", "Cincinnati, OH", "Clarksville, TN", "Cleveland, OH", "Colorado Springs, CO",
  "Columbia, SC", "Columbus, GA", "Columbus, OH", "Corpus Christi, TX", "Dallas, TX",
  "Dayton, OH", "Daytona Beach, FL", "Deltona, FL", "Denver, CO", "Des Moines, IA",
  "Detroit, MI", "Durham, NC", "El Paso, TX", "Eugene, OR", "Evansville, IN", "Fargo, ND",
  "Fayetteville, AR", "Fayetteville, NC", "Flint, MI", "Fort Collins, CO", "Fort Myers, FL",
  "Fort Wayne, IN", "Fort Worth, TX", "Fresno, CA", "Gainesville, FL", "Grand Rapids, MI",
  "Green Bay, WI", "Greensboro, NC", "Greenville, SC", "Harrisburg, PA", "Hartford, CT",
  "Honolulu, HI", "Houston, TX", "Huntsville, AL", "Indianapolis, IN", "Jackson, MS",
  "Jacksonville, FL", "Jersey City, NJ", "Kalamazoo, MI", "Kansas City, MO", "Killeen, TX",
  "Knoxville, TN", "Lafayette, LA", "Lakeland, FL", "Lancaster, PA", "Lansing, MI", "Laredo, TX",
  "Las Vegas, NV", "Lexington, KY", "Lincoln, NE", "Little Rock, AR", "Los Angeles, CA",
  "Louisville, KY", "Lubbock, TX", "Madison, WI", "Manchester, NH", "McAllen, TX", "Memphis, TN",
  "Miami, FL", "Milwaukee, WI", "Minneapolis, MN", "Mobile, AL", "Modesto, CA", "Montgomery, AL",
  "Myrtle Beach, SC", "Nashville, TN", "New Haven, CT", "New Orleans, LA", "New York, NY",
  "Newark, NJ", "Norfolk, VA", "North Port, FL", "Ogden, UT", "Oklahoma City, OK", "Omaha, NE",
  "Orlando, FL", "Oxnard, CA", "Palm Bay, FL", "Pensacola, FL", "Peoria, IL", "Philadelphia, PA",
  "Phoenix, AZ", "Pittsburgh, PA", "Portland, ME", "Portland, OR", "Providence, RI", "Provo, UT",
  "Raleigh, NC", "Reading, PA", "Reno, NV", "Richmond, VA", "Riverside, CA", "Rochester, NY",
  "Rockford, IL", "Sacramento, CA", "Salem, OR", "Salinas, CA", "Salt Lake City, UT",
  "San Antonio, TX", "San Diego, CA", "San Francisco, CA", "San Jose, CA", "Santa Barbara, CA",
  "Santa Rosa, CA", "Savannah, GA", "Scranton, PA", "Seattle, WA", "Shreveport, LA",
  "Spokane, WA", "Springfield, IL", "Springfield, MA", "Springfield, MO", "St Louis, MO",
  "Stamford, CT", "Stockton, CA", "Syracuse, NY", "Tacoma, WA", "Tallahassee, FL", "Tampa, FL",
  "Toledo, OH", "Topeka, KS", "Trenton, NJ", "Tucson, AZ", "Tulsa, OK", "Tuscaloosa, AL",
  "Tyler, TX", "Utica, NY", "Vallejo, CA", "Virginia Beach, VA", "Visalia, CA", "Waco, TX",
  "Washington DC", "Wichita, KS", "Wilmington, NC", "Winston-Salem, NC", "Worcester, MA",
  "York, PA", "Youngstown, OH",
];

/// Hints in reveal order. The first is free; the rest unlock on wrong guesses.
pub fn seed_hints() -> [HintDescriptor; TOTAL_HINTS] {
  [
    hint("Industry Breakdown", 0),
    hint("Salary Ranges", 200),
    hint("Employment Growth", 200),
    hint("Metro Comparison", 150),
    hint("Top Employers", 150),
  ]
}

fn hint(name: &str, penalty_display_only: u32) -> HintDescriptor {
  HintDescriptor { name: name.into(), penalty_display_only }
}

/// Mean/std of the synthetic score histogram per metro id.
pub fn seed_score_profiles() -> HashMap<String, ScoreProfile> {
  HashMap::from_iter([
    ("Memphis".to_string(), ScoreProfile { mean: 33.0, std: 7.0 }),
    ("Charlotte".to_string(), ScoreProfile { mean: 41.0, std: 6.0 }),
    ("DC".to_string(), ScoreProfile { mean: 39.0, std: 5.0 }),
    ("Pittsburgh".to_string(), ScoreProfile { mean: 31.0, std: 8.0 }),
    ("Houston".to_string(), ScoreProfile { mean: 44.0, std: 5.0 }),
  ])
}
