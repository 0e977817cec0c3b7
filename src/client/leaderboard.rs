use crate::db::models::Donation;

/// Donations ordered by amount, largest first. Equal amounts keep list order.
pub fn leaderboard(donations: &[Donation]) -> Vec<Donation> {
    let mut sorted = donations.to_vec();
    sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    sorted
}

pub fn total_raised(donations: &[Donation]) -> f64 {
    donations.iter().map(|d| d.amount).sum()
}

pub fn donor_count(donations: &[Donation]) -> usize {
    donations.len()
}

/// Id for the next donation: one past the largest id seen, or 1.
pub fn next_id(donations: &[Donation]) -> i64 {
    donations.iter().map(|d| d.id).max().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donation(id: i64, name: &str, amount: f64) -> Donation {
        Donation {
            id,
            name: name.to_string(),
            amount,
            date: "2025-10-20".to_string(),
            location: "India".to_string(),
            payment_id: String::new(),
            email: String::new(),
        }
    }

    #[test]
    fn orders_by_amount_descending() {
        let list = vec![
            donation(1, "Asha", 500.0),
            donation(2, "Ravi", 2000.0),
            donation(3, "Meera", 100.0),
        ];
        let amounts: Vec<f64> = leaderboard(&list).iter().map(|d| d.amount).collect();
        assert_eq!(amounts, vec![2000.0, 500.0, 100.0]);
    }

    #[test]
    fn ties_keep_list_order() {
        let list = vec![
            donation(1, "Asha", 100.0),
            donation(2, "Ravi", 250.0),
            donation(3, "Meera", 100.0),
        ];
        let names: Vec<String> = leaderboard(&list).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Ravi", "Asha", "Meera"]);
    }

    #[test]
    fn totals() {
        let list = vec![donation(1, "Asha", 500.0), donation(2, "Ravi", 250.5)];
        assert_eq!(total_raised(&list), 750.5);
        assert_eq!(donor_count(&list), 2);
        assert_eq!(total_raised(&[]), 0.0);
    }

    #[test]
    fn next_id_is_max_plus_one() {
        assert_eq!(next_id(&[]), 1);
        let list = vec![donation(4, "Asha", 1.0), donation(2, "Ravi", 1.0)];
        assert_eq!(next_id(&list), 5);
    }
}
