//! Random demo fixtures for the academic catalogue.
//!
//! Every generator takes the RNG explicitly so fixtures can be reproduced
//! from a seed.

use crate::models::{Career, Department, Faculty, Student};
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

const CAREER_NAMES: [&str; 6] = [
  "Ingeniería de Software",
  "Medicina",
  "Derecho",
  "Psicología",
  "Arquitectura",
  "Administración",
];

const FACULTY_NAMES: [&str; 5] = [
  "Facultad de Ingeniería",
  "Facultad de Medicina",
  "Facultad de Derecho",
  "Facultad de Ciencias",
  "Facultad de Humanidades",
];

const FIRST_NAMES: [&str; 10] = [
  "Camila", "Matias", "Valentina", "Benjamin", "Isidora", "Vicente", "Florencia", "Tomas",
  "Antonia", "Joaquin",
];

const LAST_NAMES: [&str; 10] = [
  "Gonzalez", "Munoz", "Rojas", "Diaz", "Perez", "Soto", "Contreras", "Silva", "Martinez",
  "Sepulveda",
];

const COMPANY_SUFFIXES: [&str; 4] = ["y Asociados", "Ltda.", "S.A.", "Group"];

const COUNTRIES: [&str; 6] = ["Chile", "Argentina", "Peru", "Bolivia", "Colombia", "Uruguay"];

const MARITAL_STATUSES: [&str; 3] = ["Soltero", "Casado", "Divorciado"];

const SENTENCES: [&str; 4] = [
  "Requiere seguimiento academico.",
  "Postula a beca de alimentacion.",
  "Participa en el centro de estudiantes.",
  "Solicito cambio de carrera.",
];

const EMAIL_PROVIDERS: [&str; 3] = ["gmail.com", "hotmail.com", "yahoo.com"];
const INSTITUTIONAL_PROVIDER: &str = "universidad.edu";

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[&'static str]) -> &'static str {
  items.choose(rng).copied().unwrap_or_default()
}

fn numeric_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
  (0..len)
    .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
    .collect()
}

fn id<R: Rng + ?Sized>(rng: &mut R) -> i64 {
  rng.gen_range(1..=i64::from(u32::MAX))
}

fn email<R: Rng + ?Sized>(rng: &mut R, first: &str, last: &str, provider: &str) -> String {
  format!(
    "{}.{}{}@{}",
    first.to_lowercase(),
    last.to_lowercase(),
    rng.gen_range(1..100),
    provider
  )
}

pub fn fake_student<R: Rng + ?Sized>(rng: &mut R) -> Student {
  let first = pick(rng, &FIRST_NAMES);
  let paternal = pick(rng, &LAST_NAMES);
  let maternal = pick(rng, &LAST_NAMES);
  let birth_date = Utc::now().date_naive() - Duration::days(rng.gen_range(1..=365));
  let provider = pick(rng, &EMAIL_PROVIDERS);
  Student {
    id: id(rng),
    rut: numeric_string(rng, 8),
    first_names: first.to_string(),
    paternal_surname: paternal.to_string(),
    maternal_surname: maternal.to_string(),
    birth_date: birth_date.format("%d-%m-%Y").to_string(),
    nationality: pick(rng, &COUNTRIES).to_string(),
    sex: pick(rng, &["M", "F"]).to_string(),
    marital_status: pick(rng, &MARITAL_STATUSES).to_string(),
    comment: if rng.gen_bool(0.5) {
      Some(pick(rng, &SENTENCES).to_string())
    } else {
      None
    },
    phone: format!("+56 9 {} {}", numeric_string(rng, 4), numeric_string(rng, 4)),
    email: email(rng, first, paternal, provider),
    institutional_email: email(rng, first, paternal, INSTITUTIONAL_PROVIDER),
  }
}

pub fn fake_career<R: Rng + ?Sized>(rng: &mut R, department_id: Option<i64>) -> Career {
  Career {
    code: numeric_string(rng, 6),
    department_id: department_id.unwrap_or_else(|| rng.gen_range(1..=20)),
    grade_id: rng.gen_range(1..=5),
    antecedent_id: rng.gen_range(1..=10),
    accredited: rng.gen(),
    name: pick(rng, &CAREER_NAMES).to_string(),
    department: None,
    faculty: None,
  }
}

pub fn fake_department<R: Rng + ?Sized>(
  rng: &mut R,
  faculty_id: Option<i64>,
  with_careers: bool,
) -> Department {
  let department_id = id(rng);
  let name = format!("{} {}", pick(rng, &LAST_NAMES), pick(rng, &COMPANY_SUFFIXES));
  let faculty_id = faculty_id.unwrap_or_else(|| rng.gen_range(1..=10));
  let careers = if with_careers {
    let count = rng.gen_range(1..=4);
    (0..count)
      .map(|_| fake_career(rng, Some(department_id)))
      .collect()
  } else {
    Vec::new()
  };
  Department {
    department_id,
    name,
    faculty_id,
    faculty: None,
    careers: Some(careers),
  }
}

pub fn fake_faculty<R: Rng + ?Sized>(rng: &mut R, with_departments: bool) -> Faculty {
  let faculty_id = id(rng);
  let name = pick(rng, &FACULTY_NAMES).to_string();
  let departments = if with_departments {
    let count = rng.gen_range(2..=5);
    (0..count)
      .map(|_| fake_department(rng, Some(faculty_id), false))
      .collect()
  } else {
    Vec::new()
  };
  Faculty {
    faculty_id,
    name,
    departments: Some(departments),
  }
}

/// A career with its department and faculty embedded and the ids linked.
pub fn fake_career_with_relations<R: Rng + ?Sized>(rng: &mut R) -> Career {
  let faculty = fake_faculty(rng, false);
  let department = fake_department(rng, Some(faculty.faculty_id), false);
  let mut career = fake_career(rng, Some(department.department_id));
  career.department = Some(Box::new(department));
  career.faculty = Some(Box::new(faculty));
  career
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  #[test]
  fn test_fake_career_ranges() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
      let career = fake_career(&mut rng, None);
      assert!((1..=20).contains(&career.department_id));
      assert!((1..=5).contains(&career.grade_id));
      assert!((1..=10).contains(&career.antecedent_id));
      assert_eq!(career.code.len(), 6);
      assert!(career.code.chars().all(|c| c.is_ascii_digit()));
      assert!(CAREER_NAMES.contains(&career.name.as_str()));
    }
    assert_eq!(fake_career(&mut rng, Some(99)).department_id, 99);
  }

  #[test]
  fn test_fake_department_links_careers() {
    let mut rng = StdRng::seed_from_u64(11);
    let department = fake_department(&mut rng, Some(3), true);
    assert_eq!(department.faculty_id, 3);
    let careers = department.careers.unwrap();
    assert!((1..=4).contains(&careers.len()));
    assert!(careers
      .iter()
      .all(|c| c.department_id == department.department_id));

    let bare = fake_department(&mut rng, None, false);
    assert!((1..=10).contains(&bare.faculty_id));
    assert_eq!(bare.careers, Some(vec![]));
  }

  #[test]
  fn test_fake_faculty_links_departments() {
    let mut rng = StdRng::seed_from_u64(3);
    let faculty = fake_faculty(&mut rng, true);
    let departments = faculty.departments.unwrap();
    assert!((2..=5).contains(&departments.len()));
    assert!(departments
      .iter()
      .all(|d| d.faculty_id == faculty.faculty_id));
    assert!(FACULTY_NAMES.contains(&faculty.name.as_str()));
  }

  #[test]
  fn test_fake_career_with_relations() {
    let mut rng = StdRng::seed_from_u64(5);
    let career = fake_career_with_relations(&mut rng);
    let department = career.department.as_ref().unwrap();
    let faculty = career.faculty.as_ref().unwrap();
    assert_eq!(career.department_id, department.department_id);
    assert_eq!(department.faculty_id, faculty.faculty_id);
  }

  #[test]
  fn test_fake_student() {
    let mut rng = StdRng::seed_from_u64(1);
    let student = fake_student(&mut rng);
    assert_eq!(student.rut.len(), 8);
    assert!(student.sex == "M" || student.sex == "F");
    assert!(student.institutional_email.ends_with("@universidad.edu"));
    assert!(student.email.contains('@'));
  }

  #[test]
  fn test_same_seed_same_fixture() {
    let a = fake_faculty(&mut StdRng::seed_from_u64(42), true);
    let b = fake_faculty(&mut StdRng::seed_from_u64(42), true);
    assert_eq!(a, b);
  }
}
