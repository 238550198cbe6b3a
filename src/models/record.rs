use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// The fields printed on the front of a KTP, in card order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Nik,
    Nama,
    TempatTglLahir,
    JenisKelamin,
    GolDarah,
    Alamat,
    RtRw,
    KelDesa,
    Kecamatan,
    Agama,
    StatusPerkawinan,
    Pekerjaan,
    Kewarganegaraan,
    BerlakuHingga,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::Nik,
        Field::Nama,
        Field::TempatTglLahir,
        Field::JenisKelamin,
        Field::GolDarah,
        Field::Alamat,
        Field::RtRw,
        Field::KelDesa,
        Field::Kecamatan,
        Field::Agama,
        Field::StatusPerkawinan,
        Field::Pekerjaan,
        Field::Kewarganegaraan,
        Field::BerlakuHingga,
    ];

    /// Key used in the serialized record, as printed on the card.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Nik => "NIK",
            Field::Nama => "Nama",
            Field::TempatTglLahir => "Tempat/Tgl Lahir",
            Field::JenisKelamin => "Jenis Kelamin",
            Field::GolDarah => "Gol. Darah",
            Field::Alamat => "Alamat",
            Field::RtRw => "RT/RW",
            Field::KelDesa => "Kel/Desa",
            Field::Kecamatan => "Kecamatan",
            Field::Agama => "Agama",
            Field::StatusPerkawinan => "Status Perkawinan",
            Field::Pekerjaan => "Pekerjaan",
            Field::Kewarganegaraan => "Kewarganegaraan",
            Field::BerlakuHingga => "Berlaku Hingga",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extracted values keyed by [`Field`]. Every field is always present and
/// starts out empty; values can be replaced but never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRecord {
    values: [String; 14],
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Iterates over every field in card order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.iter().map(move |field| (*field, self.get(*field)))
    }

    pub fn filled(&self) -> usize {
        self.values.iter().filter(|v| !v.is_empty()).count()
    }
}

impl Serialize for FieldRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::ALL.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.label(), value)?;
        }
        map.end()
    }
}
