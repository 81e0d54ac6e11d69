//! Fixed typedefs and initializer macros
//!
//! The initializers emitted for strings and objects go through these
//! macros so that one set of records serves every combination of byte
//! order, pointer compression and tagged value packing.

/// Select the string hash variant matching the runtime's hash config
pub const STRHASH_MACROS: &[&str] = &[
    "/* When unaligned access possible, 32-bit values are fetched using host order.",
    " * When unaligned access not possible, always simulate little endian order.",
    " * See: src/duk_util_hashbytes.c:duk_util_hashbytes().",
    " */",
    "#if defined(DUK_USE_STRHASH_DENSE)",
    "#if defined(DUK_USE_HASHBYTES_UNALIGNED_U32_ACCESS)",
    "#if defined(DUK_USE_INTEGER_BE)",
    "#define DUK__STRHASH16(hash16le,hash16be,hash16sparse) (hash16be)",
    "#define DUK__STRHASH32(hash32le,hash32be,hash32sparse) (hash32be)",
    "#else",
    "#define DUK__STRHASH16(hash16le,hash16be,hash16sparse) (hash16le)",
    "#define DUK__STRHASH32(hash32le,hash32be,hash32sparse) (hash32le)",
    "#endif",
    "#else",
    "#define DUK__STRHASH16(hash16le,hash16be,hash16sparse) (hash16le)",
    "#define DUK__STRHASH32(hash32le,hash32be,hash32sparse) (hash32le)",
    "#endif",
    "#else  /* DUK_USE_STRHASH_DENSE */",
    "#define DUK__STRHASH16(hash16le,hash16be,hash16sparse) (hash16sparse)",
    "#define DUK__STRHASH32(hash32le,hash32be,hash32sparse) (hash32sparse)",
    "#endif  /* DUK_USE_STRHASH_DENSE */",
];

/// String header initializer
pub const STRINIT_MACROS: &[&str] = &[
    "#if defined(DUK_USE_HEAPPTR16)",
    "#if !defined(DUK_USE_REFCOUNT16)",
    "#error currently assumes DUK_USE_HEAPPTR16 and DUK_USE_REFCOUNT16 are both defined",
    "#endif",
    "#if defined(DUK_USE_HSTRING_CLEN)",
    "#define DUK__STRINIT(heaphdr_flags,refcount,hash32,hash16,blen,clen) \\",
    "\t{ { (heaphdr_flags) | ((hash16) << 16), (refcount), (blen) }, (clen) }",
    "#else  /* DUK_USE_HSTRING_CLEN */",
    "#define DUK__STRINIT(heaphdr_flags,refcount,hash32,hash16,blen,clen) \\",
    "\t{ { (heaphdr_flags) | ((hash16) << 16), (refcount), (blen) } }",
    "#endif  /* DUK_USE_HSTRING_CLEN */",
    "#else  /* DUK_USE_HEAPPTR16 */",
    "#define DUK__STRINIT(heaphdr_flags,refcount,hash32,hash16,blen,clen) \\",
    "\t{ { (heaphdr_flags), (refcount) }, (hash32), (blen), (clen) }",
    "#endif  /* DUK_USE_HEAPPTR16 */",
];

/// Object record types and header initializers
pub const OBJECT_INIT_MACROS: &[&str] = &[
    "typedef struct duk_romobj duk_romobj; struct duk_romobj { duk_hobject hdr; };",
    "typedef struct duk_romarr duk_romarr; struct duk_romarr { duk_harray hdr; };",
    "typedef struct duk_romfun duk_romfun; struct duk_romfun { duk_hnatfunc hdr; };",
    "#if defined(DUK_USE_HEAPPTR16)",
    "#if !defined(DUK_USE_REFCOUNT16) || defined(DUK_USE_HOBJECT_HASH_PART)",
    "#error currently assumes DUK_USE_HEAPPTR16 and DUK_USE_REFCOUNT16 are both defined and DUK_USE_HOBJECT_HASH_PART is undefined",
    "#endif",
    "#define DUK__ROMOBJ_INIT(heaphdr_flags,refcount,props,props_enc16,iproto,iproto_enc16,esize,enext,asize,hsize) \\",
    "\t{ { { (heaphdr_flags), (refcount), 0, 0, (props_enc16) }, (iproto_enc16), (esize), (enext), (asize) } }",
    "#define DUK__ROMARR_INIT(heaphdr_flags,refcount,props,props_enc16,iproto,iproto_enc16,esize,enext,asize,hsize,length) \\",
    "\t{ { { { (heaphdr_flags), (refcount), 0, 0, (props_enc16) }, (iproto_enc16), (esize), (enext), (asize) }, (length), 0 /*length_nonwritable*/ } }",
    "#define DUK__ROMFUN_INIT(heaphdr_flags,refcount,props,props_enc16,iproto,iproto_enc16,esize,enext,asize,hsize,nativefunc,nargs,magic) \\",
    "\t{ { { { (heaphdr_flags), (refcount), 0, 0, (props_enc16) }, (iproto_enc16), (esize), (enext), (asize) }, (nativefunc), (duk_int16_t) (nargs), (duk_int16_t) (magic) } }",
    "#else  /* DUK_USE_HEAPPTR16 */",
    "#define DUK__ROMOBJ_INIT(heaphdr_flags,refcount,props,props_enc16,iproto,iproto_enc16,esize,enext,asize,hsize) \\",
    "\t{ { { (heaphdr_flags), (refcount), NULL, NULL }, (duk_uint8_t *) DUK_LOSE_CONST(props), (duk_hobject *) DUK_LOSE_CONST(iproto), (esize), (enext), (asize), (hsize) } }",
    "#define DUK__ROMARR_INIT(heaphdr_flags,refcount,props,props_enc16,iproto,iproto_enc16,esize,enext,asize,hsize,length) \\",
    "\t{ { { { (heaphdr_flags), (refcount), NULL, NULL }, (duk_uint8_t *) DUK_LOSE_CONST(props), (duk_hobject *) DUK_LOSE_CONST(iproto), (esize), (enext), (asize), (hsize) }, (length), 0 /*length_nonwritable*/ } }",
    "#define DUK__ROMFUN_INIT(heaphdr_flags,refcount,props,props_enc16,iproto,iproto_enc16,esize,enext,asize,hsize,nativefunc,nargs,magic) \\",
    "\t{ { { { (heaphdr_flags), (refcount), NULL, NULL }, (duk_uint8_t *) DUK_LOSE_CONST(props), (duk_hobject *) DUK_LOSE_CONST(iproto), (esize), (enext), (asize), (hsize) }, (nativefunc), (duk_int16_t) (nargs), (duk_int16_t) (magic) } }",
    "#endif  /* DUK_USE_HEAPPTR16 */",
];

/// Tagged value record types, packed and unpacked
pub const TVAL_TYPES: &[&str] = &[
    "#if defined(DUK_USE_PACKED_TVAL)",
    "typedef struct duk_rom_tval_undefined duk_rom_tval_undefined;",
    "typedef struct duk_rom_tval_null duk_rom_tval_null;",
    "typedef struct duk_rom_tval_boolean duk_rom_tval_boolean;",
    "typedef struct duk_rom_tval_number duk_rom_tval_number;",
    "typedef struct duk_rom_tval_object duk_rom_tval_object;",
    "typedef struct duk_rom_tval_string duk_rom_tval_string;",
    "typedef struct duk_rom_tval_accessor duk_rom_tval_accessor;",
    "struct duk_rom_tval_number { duk_uint8_t bytes[8]; };",
    "struct duk_rom_tval_accessor { const duk_hobject *get; const duk_hobject *set; };",
    "#if defined(DUK_USE_DOUBLE_LE)",
    "struct duk_rom_tval_object { const void *ptr; duk_uint32_t hiword; };",
    "struct duk_rom_tval_string { const void *ptr; duk_uint32_t hiword; };",
    "struct duk_rom_tval_undefined { const void *ptr; duk_uint32_t hiword; };",
    "struct duk_rom_tval_null { const void *ptr; duk_uint32_t hiword; };",
    "struct duk_rom_tval_boolean { duk_uint32_t dummy; duk_uint32_t hiword; };",
    "#elif defined(DUK_USE_DOUBLE_BE)",
    "struct duk_rom_tval_object { duk_uint32_t hiword; const void *ptr; };",
    "struct duk_rom_tval_string { duk_uint32_t hiword; const void *ptr; };",
    "struct duk_rom_tval_undefined { duk_uint32_t hiword; const void *ptr; };",
    "struct duk_rom_tval_null { duk_uint32_t hiword; const void *ptr; };",
    "struct duk_rom_tval_boolean { duk_uint32_t hiword; duk_uint32_t dummy; };",
    "#elif defined(DUK_USE_DOUBLE_ME)",
    "struct duk_rom_tval_object { duk_uint32_t hiword; const void *ptr; };",
    "struct duk_rom_tval_string { duk_uint32_t hiword; const void *ptr; };",
    "struct duk_rom_tval_undefined { duk_uint32_t hiword; const void *ptr; };",
    "struct duk_rom_tval_null { duk_uint32_t hiword; const void *ptr; };",
    "struct duk_rom_tval_boolean { duk_uint32_t hiword; duk_uint32_t dummy; };",
    "#else",
    "#error invalid endianness defines",
    "#endif",
    "#else  /* DUK_USE_PACKED_TVAL */",
    "#if defined(DUK_UINTPTR_MAX)",
    "#if (DUK_UINTPTR_MAX <= 0xffffffffUL)",
    "#error ROM initializer with unpacked duk_tval does not currently work on 32-bit targets",
    "#endif",
    "#endif",
    "typedef struct duk_rom_tval_undefined duk_rom_tval_undefined;",
    "struct duk_rom_tval_undefined { duk_small_uint_t tag; duk_small_uint_t extra; duk_uint8_t bytes[8]; };",
    "typedef struct duk_rom_tval_null duk_rom_tval_null;",
    "struct duk_rom_tval_null { duk_small_uint_t tag; duk_small_uint_t extra; duk_uint8_t bytes[8]; };",
    "typedef struct duk_rom_tval_boolean duk_rom_tval_boolean;",
    "struct duk_rom_tval_boolean { duk_small_uint_t tag; duk_small_uint_t extra; duk_uint32_t val; duk_uint32_t unused; };",
    "typedef struct duk_rom_tval_number duk_rom_tval_number;",
    "struct duk_rom_tval_number { duk_small_uint_t tag; duk_small_uint_t extra; duk_uint8_t bytes[8]; };",
    "typedef struct duk_rom_tval_object duk_rom_tval_object;",
    "struct duk_rom_tval_object { duk_small_uint_t tag; duk_small_uint_t extra; const duk_heaphdr *val; };",
    "typedef struct duk_rom_tval_string duk_rom_tval_string;",
    "struct duk_rom_tval_string { duk_small_uint_t tag; duk_small_uint_t extra; const duk_heaphdr *val; };",
    "typedef struct duk_rom_tval_accessor duk_rom_tval_accessor;",
    "struct duk_rom_tval_accessor { const duk_hobject *get; const duk_hobject *set; };",
    "#endif  /* DUK_USE_PACKED_TVAL */",
    "",
];

/// Double bytes are written big endian and shuffled to host order
pub const DBLBYTES_MACROS: &[&str] = &[
    "#if defined(DUK_USE_DOUBLE_LE)",
    "#define DUK__DBLBYTES(a,b,c,d,e,f,g,h) { (h), (g), (f), (e), (d), (c), (b), (a) }",
    "#elif defined(DUK_USE_DOUBLE_BE)",
    "#define DUK__DBLBYTES(a,b,c,d,e,f,g,h) { (a), (b), (c), (d), (e), (f), (g), (h) }",
    "#elif defined(DUK_USE_DOUBLE_ME)",
    "#define DUK__DBLBYTES(a,b,c,d,e,f,g,h) { (d), (c), (b), (a), (h), (g), (f), (e) }",
    "#else",
    "#error invalid endianness defines",
    "#endif",
    "",
];

/// Tagged value initializer literals
pub const TVAL_MACROS: &[&str] = &[
    "#if defined(DUK_USE_PACKED_TVAL)",
    "#define DUK__TVAL_NUMBER(hostbytes) { hostbytes }",
    "#if defined(DUK_USE_DOUBLE_LE)",
    "#define DUK__TVAL_UNDEFINED() { (const void *) NULL, (DUK_TAG_UNDEFINED << 16) }",
    "#define DUK__TVAL_NULL() { (const void *) NULL, (DUK_TAG_NULL << 16) }",
    "#define DUK__TVAL_BOOLEAN(bval) { 0, (DUK_TAG_BOOLEAN << 16) + (bval) }",
    "#define DUK__TVAL_OBJECT(ptr) { (const void *) (ptr), (DUK_TAG_OBJECT << 16) }",
    "#define DUK__TVAL_STRING(ptr) { (const void *) (ptr), (DUK_TAG_STRING << 16) }",
    "#elif defined(DUK_USE_DOUBLE_BE)",
    "#define DUK__TVAL_UNDEFINED() { (DUK_TAG_UNDEFINED << 16), (const void *) NULL }",
    "#define DUK__TVAL_NULL() { (DUK_TAG_NULL << 16), (const void *) NULL }",
    "#define DUK__TVAL_BOOLEAN(bval) { (DUK_TAG_BOOLEAN << 16) + (bval), 0 }",
    "#define DUK__TVAL_OBJECT(ptr) { (DUK_TAG_OBJECT << 16), (const void *) (ptr) }",
    "#define DUK__TVAL_STRING(ptr) { (DUK_TAG_STRING << 16), (const void *) (ptr) }",
    "#elif defined(DUK_USE_DOUBLE_ME)",
    "#define DUK__TVAL_UNDEFINED() { (DUK_TAG_UNDEFINED << 16), (const void *) NULL }",
    "#define DUK__TVAL_NULL() { (DUK_TAG_NULL << 16), (const void *) NULL }",
    "#define DUK__TVAL_BOOLEAN(bval) { (DUK_TAG_BOOLEAN << 16) + (bval), 0 }",
    "#define DUK__TVAL_OBJECT(ptr) { (DUK_TAG_OBJECT << 16), (const void *) (ptr) }",
    "#define DUK__TVAL_STRING(ptr) { (DUK_TAG_STRING << 16), (const void *) (ptr) }",
    "#else",
    "#error invalid endianness defines",
    "#endif",
    "#else  /* DUK_USE_PACKED_TVAL */",
    "#define DUK__TVAL_NUMBER(hostbytes) { DUK__TAG_NUMBER, 0, hostbytes }",
    "#define DUK__TVAL_UNDEFINED() { DUK_TAG_UNDEFINED, 0, {0,0,0,0,0,0,0,0} }",
    "#define DUK__TVAL_NULL() { DUK_TAG_NULL, 0, {0,0,0,0,0,0,0,0} }",
    "#define DUK__TVAL_BOOLEAN(bval) { DUK_TAG_BOOLEAN, 0, (bval), 0 }",
    "#define DUK__TVAL_OBJECT(ptr) { DUK_TAG_OBJECT, 0, (const duk_heaphdr *) (ptr) }",
    "#define DUK__TVAL_STRING(ptr) { DUK_TAG_STRING, 0, (const duk_heaphdr *) (ptr) }",
    "#endif  /* DUK_USE_PACKED_TVAL */",
];

/// Helper macros removed at the end of the ROM section
pub const HELPER_MACROS: &[&str] = &[
    "DUK__STRHASH16",
    "DUK__STRHASH32",
    "DUK__DBLBYTES",
    "DUK__TVAL_NUMBER",
    "DUK__TVAL_UNDEFINED",
    "DUK__TVAL_NULL",
    "DUK__TVAL_BOOLEAN",
    "DUK__TVAL_OBJECT",
    "DUK__TVAL_STRING",
    "DUK__STRINIT",
    "DUK__ROMOBJ_INIT",
    "DUK__ROMARR_INIT",
    "DUK__ROMFUN_INIT",
];
