use serde::{Deserialize, Serialize};

/// Facility tags grouped by category. A missing or `null` group counts as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Facilities {
    #[serde(default)]
    pub furniture: Option<Vec<String>>,
    #[serde(default)]
    pub kitchen: Option<Vec<String>>,
    #[serde(default)]
    pub bathroom: Option<Vec<String>>,
    #[serde(default)]
    pub utility: Option<Vec<String>>,
}

type GroupAccessor = fn(&Facilities) -> &Option<Vec<String>>;

fn furniture(f: &Facilities) -> &Option<Vec<String>> { &f.furniture }
fn kitchen(f: &Facilities) -> &Option<Vec<String>> { &f.kitchen }
fn bathroom(f: &Facilities) -> &Option<Vec<String>> { &f.bathroom }
fn utility(f: &Facilities) -> &Option<Vec<String>> { &f.utility }

/// Facility groups in query order.
static FACILITY_GROUPS: [GroupAccessor; 4] = [furniture, kitchen, bathroom, utility];

impl Facilities {
    /// All tags, group by group in declared order.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        FACILITY_GROUPS
            .iter()
            .filter_map(move |group| group(self).as_deref())
            .flatten()
            .map(String::as_str)
    }
}

/// Structured preference form submitted by a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceForm {
    pub tipe_lokasi: Vec<String>,
    /// Underscore-delimited compound token, e.g. `2_BR`
    pub tipe_kamar_tidur: String,
    pub facilities: Facilities,
    pub descriptions_proximity_category: Vec<String>,
    pub descriptions_building_facility: Vec<String>,
}

/// Flattens a form into a space-joined bag of terms. Tokens pass through verbatim.
pub fn build_query(form: &PreferenceForm) -> String {
    let tokens: Vec<&str> = form
        .tipe_lokasi
        .iter()
        .map(String::as_str)
        .chain(form.tipe_kamar_tidur.split('_'))
        .chain(form.facilities.tags())
        .chain(form.descriptions_proximity_category.iter().map(String::as_str))
        .chain(form.descriptions_building_facility.iter().map(String::as_str))
        .collect();
    tokens.join(" ")
}
