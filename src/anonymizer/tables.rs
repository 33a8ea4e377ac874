use super::hashing::stable_index;

/// Fixed-size source of substitute values, indexed by `stable_index`
pub trait LookupTable<T>: Sync {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&T>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry for `key`, or None when the table is empty
    fn pick(&self, key: &str) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.get(stable_index(key, self.len()))
    }
}

impl<T: Sync> LookupTable<T> for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }
}

impl<T: Sync, const N: usize> LookupTable<T> for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

impl<T: Sync> LookupTable<T> for Vec<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

/// Substitute venue shown in place of a real store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Venue {
    pub name: &'static str,
    pub address: &'static str,
    pub city: &'static str,
    pub state: &'static str,
}

pub const DEMO_ZIP_CODE: &str = "12345";

pub static VENUES: [Venue; 5] = [
    Venue {
        name: "Lucky Star Lounge",
        address: "101 Main Street",
        city: "Springfield",
        state: "TN",
    },
    Venue {
        name: "Golden Horseshoe Bar",
        address: "220 Oak Avenue",
        city: "Riverton",
        state: "KY",
    },
    Venue {
        name: "Silver Dollar Saloon",
        address: "38 Elm Court",
        city: "Fairview",
        state: "OH",
    },
    Venue {
        name: "Blue Moon Tavern",
        address: "415 Pine Road",
        city: "Lakewood",
        state: "GA",
    },
    Venue {
        name: "Jackpot Junction",
        address: "9 Cedar Lane",
        city: "Brookfield",
        state: "AL",
    },
];

pub static FIRST_NAMES: [&str; 20] = [
    "James", "Mary", "Robert", "Patricia", "John",
    "Jennifer", "Michael", "Linda", "David", "Elizabeth",
    "William", "Barbara", "Richard", "Susan", "Joseph",
    "Jessica", "Thomas", "Sarah", "Charles", "Karen",
];

pub static LAST_NAMES: [&str; 20] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones",
    "Garcia", "Miller", "Davis", "Rodriguez", "Martinez",
    "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
    "Thomas", "Taylor", "Moore", "Jackson", "Martin",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_uses_stable_index() {
        let table = ["a", "b", "c"];
        let key = "hub-77";
        assert_eq!(table.pick(key), Some(&table[stable_index(key, 3)]));
    }

    #[test]
    fn test_empty_table_picks_nothing() {
        let table: Vec<&str> = Vec::new();
        assert!(table.pick("anything").is_none());
    }

    #[test]
    fn test_slice_and_vec_agree() {
        let names = vec!["Ada", "Grace", "Edsger", "Barbara"];
        let slice: &[&str] = &names;
        assert_eq!(slice.pick("user-1first"), names.pick("user-1first"));
    }
}
