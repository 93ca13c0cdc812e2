//! Generated identifiers: wizard route codes and server-side route uids.

use rand::Rng;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Uppercase base36 string of `len` random characters.
pub fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Route code: `<role prefix or RT><last 6 digits of epoch millis><3 base36 chars>`.
///
/// The prefix is the first three characters of the role uid, uppercased.
/// Codes are not checked for uniqueness.
pub fn route_code<R: Rng + ?Sized>(role_uid: &str, epoch_millis: i64, rng: &mut R) -> String {
    let prefix: String = if role_uid.is_empty() {
        "RT".to_string()
    } else {
        role_uid.chars().take(3).collect::<String>().to_uppercase()
    };

    format!(
        "{}{:06}{}",
        prefix,
        epoch_millis.rem_euclid(1_000_000),
        random_base36(rng, 3)
    )
}

/// Primary key for an inserted route row.
pub fn route_uid<R: Rng + ?Sized>(epoch_millis: i64, rng: &mut R) -> String {
    format!("RT{}{}", epoch_millis, random_base36(rng, 9))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn is_base36_upper(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    }

    #[test]
    fn empty_role_falls_back_to_rt() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = route_code("", 1_718_000_123_456, &mut rng);

        assert_eq!(code.len(), 11);
        assert!(code.starts_with("RT123456"));
        assert!(is_base36_upper(&code[8..]));
    }

    #[test]
    fn role_prefix_is_three_uppercase_chars() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = route_code("driver", 1_718_000_000_042, &mut rng);

        assert_eq!(code.len(), 12);
        assert!(code.starts_with("DRI000042"));
        assert!(is_base36_upper(&code[9..]));
    }

    #[test]
    fn code_shape_holds_for_many_roles() {
        let mut rng = StdRng::seed_from_u64(99);
        for role in ["", "a", "Admin", "SUPERVISOR", "ops-east"] {
            for millis in [0_i64, 999_999, 1_000_000, 1_718_000_000_000] {
                let code = route_code(role, millis, &mut rng);
                let prefix_len = if role.is_empty() { 2 } else { role.len().min(3) };
                assert_eq!(code.len(), prefix_len + 9, "{code}");
                assert!(code[prefix_len..prefix_len + 6].chars().all(|c| c.is_ascii_digit()));
                assert!(is_base36_upper(&code[prefix_len + 6..]));
            }
        }
    }

    #[test]
    fn route_uid_has_rt_prefix_and_nine_char_suffix() {
        let mut rng = StdRng::seed_from_u64(1);
        let uid = route_uid(1_718_000_000_000, &mut rng);

        assert!(uid.starts_with("RT1718000000000"));
        assert_eq!(uid.len(), 2 + 13 + 9);
        assert!(is_base36_upper(&uid[15..]));
    }
}
